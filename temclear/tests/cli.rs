use approx::assert_abs_diff_eq;
use clap::Parser;
use rstest::*;
use std::io::Write;
use tem_consensus::{ClearingStatus, OfferSchedule};
use temclear::{AppConfig, BaseArgs, CliError, Commands, OutputFormat, Session};

const BUILDINGS: &str = include_str!("../data/buildings.json");
const REMOTE: &str = include_str!("../data/remote.json");

#[fixture]
fn session() -> Session {
    Session::load(BUILDINGS.as_bytes(), Some(REMOTE.as_bytes())).unwrap()
}

#[rstest]
fn parses_negative_offers() {
    let args =
        BaseArgs::try_parse_from(["temclear", "clear", "buildings.json", "--offer", "-5"]).unwrap();
    match args.command {
        Commands::Clear { offer, .. } => assert_eq!(offer, -5.0),
        other => panic!("unexpected command {other:?}"),
    }
}

#[rstest]
fn parses_sweep_format() {
    let args = BaseArgs::try_parse_from(["temclear", "sweep", "-", "-f", "table"]).unwrap();
    assert!(matches!(
        args.command,
        Commands::Sweep {
            format: OutputFormat::Table,
            ..
        }
    ));

    assert!(BaseArgs::try_parse_from(["temclear", "sweep", "-", "-f", "csv"]).is_err());
    assert!(BaseArgs::try_parse_from(["temclear", "clear", "-"]).is_err());
}

#[rstest]
fn registers_buildings_and_remote_curves(session: Session) {
    let ids = session
        .market()
        .curves()
        .map(|(id, _)| id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["Office", "Apartments", "Shopping", "Warehouse"]);
    assert_eq!(session.buildings().len(), 3);

    // the remote curve only adds a knot at 40 to the building prices
    let prices = session.market().aggregate().prices();
    assert!(prices.contains(&40.0));
    assert_eq!(prices.last(), Some(&(30.0 * 4.99)));
}

#[rstest]
#[case(0.0)]
#[case(250.0)]
#[case(800.0)]
fn remote_participants_share_the_offer(session: Session, #[case] offer: f64) {
    let response = session.respond(offer).unwrap();
    assert_eq!(response.clearing.status, ClearingStatus::Cleared);
    assert_eq!(response.buildings.len(), 3);

    let warehouse = session
        .market()
        .curve("Warehouse")
        .unwrap()
        .quantity_at_price(response.clearing.price);
    assert_abs_diff_eq!(response.total_load + warehouse, -offer, epsilon = 1e-9);
}

#[rstest]
fn report_lists_every_table(session: Session) {
    let report = serde_json::to_value(session.report()).unwrap();

    let office = &report["buildings"]["Office"];
    assert_eq!(office["ramp_slope"], 25.0);
    assert_eq!(office["breakpoints"].as_array().unwrap().len(), 5);
    assert_eq!(
        report["participants"]["Warehouse"],
        serde_json::json!([0.0, 0.0, 40.0, -120.0, 90.0, -200.0])
    );
    assert_eq!(
        report["aggregate"]["prices"].as_array().unwrap().len(),
        session.market().aggregate().len()
    );
}

#[rstest]
fn rejects_remote_curve_named_like_a_building() {
    let remote = r#"{ "Office": [0.0, 0.0, 1.0, -1.0] }"#;
    let err = Session::load(BUILDINGS.as_bytes(), Some(remote.as_bytes())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::DuplicateParticipant(id)) if id.as_str() == "Office"
    ));
}

#[rstest]
fn rejects_invalid_documents() {
    assert!(Session::load("{}".as_bytes(), None::<&[u8]>).is_err());

    let remote = r#"{ "Warehouse": [0.0, 0.0, 40.0] }"#;
    assert!(Session::load(BUILDINGS.as_bytes(), Some(remote.as_bytes())).is_err());
}

#[rstest]
fn default_schedule_sweeps_to_1900() {
    let config = AppConfig::default();
    let offers = config.schedule.offers().unwrap();
    assert_eq!(offers.len(), 20);
    assert_eq!(offers.last(), Some(&1900.0));
}

#[rstest]
fn config_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[schedule]\nkind = \"diurnal\"\nmean = 900.0\namplitude = 300.0\nsamples = 5"
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(
        config.schedule,
        OfferSchedule::Diurnal {
            mean: 900.0,
            amplitude: 300.0,
            samples: 5,
        }
    );
    let offers = config.schedule.offers().unwrap();
    assert_abs_diff_eq!(offers[0], 600.0, epsilon = 1e-9);
    assert_abs_diff_eq!(offers[2], 1200.0, epsilon = 1e-9);
}

#[rstest]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load(Some(dir.path().join("absent.toml").as_path())).is_err());
}

#[rstest]
fn clear_writes_a_response() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("buildings.json");
    let output = dir.path().join("response.json");
    std::fs::write(&input, BUILDINGS).unwrap();

    BaseArgs::try_parse_from([
        "temclear",
        "clear",
        input.to_str().unwrap(),
        "--offer",
        "500",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap()
    .evaluate()
    .unwrap();

    let response: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(response["clearing"]["status"], "cleared");
    assert_abs_diff_eq!(
        response["total_load"].as_f64().unwrap(),
        -500.0,
        epsilon = 1e-9
    );
}

#[rstest]
fn only_sweep_reads_the_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("buildings.json");
    let output = dir.path().join("out.json");
    let config = dir.path().join("absent.toml");
    std::fs::write(&input, BUILDINGS).unwrap();

    let run = |command: &str, extra: &[&str]| {
        let mut args = vec![
            "temclear",
            command,
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        BaseArgs::try_parse_from(args).unwrap().evaluate()
    };

    assert!(run("curves", &[]).is_ok());
    assert!(run("clear", &["--offer", "100"]).is_ok());
    assert!(run("sweep", &[]).is_err());
}
