use crate::Session;
use clap::ValueEnum;
use std::io::Write;
use tem_consensus::Response;

// The sweep either dumps every response as JSON or lays them out as a
// fixed-width table with one row per offer
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

const WIDTH: usize = 10;

impl OutputFormat {
    pub fn write<W: Write>(
        &self,
        session: &Session,
        responses: &[Response],
        buffer: &mut W,
    ) -> anyhow::Result<()> {
        match self {
            Self::Json => {
                serde_json::to_writer_pretty(&mut *buffer, responses)?;
                writeln!(buffer)?;
            }
            Self::Table => write_table(session, responses, &mut *buffer)?,
        };
        buffer.flush()?;
        Ok(())
    }
}

fn write_table<W: Write>(
    session: &Session,
    responses: &[Response],
    buffer: &mut W,
) -> std::io::Result<()> {
    // Building names, each centered over its pair of columns
    write!(buffer, "{:width$}", "", width = 2 * WIDTH)?;
    for bid in session.buildings() {
        write!(buffer, "{:^width$}", bid.id().as_str(), width = 2 * WIDTH)?;
    }
    writeln!(buffer)?;

    write!(buffer, "{:>WIDTH$}{:>WIDTH$}", "Offer", "Price")?;
    for _ in session.buildings() {
        write!(buffer, "{:>WIDTH$}{:>WIDTH$}", "DeltaKW", "DeltaDegF")?;
    }
    writeln!(buffer, "{:>WIDTH$}{:>WIDTH$}", "TotLoad", "Status")?;

    for response in responses {
        let clearing = &response.clearing;
        write!(
            buffer,
            "{:>WIDTH$.2}{:>WIDTH$.2}",
            clearing.offer, clearing.price
        )?;
        for building in response.buildings.values() {
            write!(
                buffer,
                "{:>WIDTH$.2}{:>WIDTH$.2}",
                building.load, building.setpoint_delta
            )?;
        }
        let status = if clearing.is_under_cleared() {
            "short"
        } else {
            "ok"
        };
        writeln!(buffer, "{:>WIDTH$.2}{:>WIDTH$}", response.total_load, status)?;
    }

    Ok(())
}
