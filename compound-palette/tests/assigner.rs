use std::thread::sleep;
use std::time::Duration;

use compound_palette::{AssignError, AssignerConfig, ColorAssigner, Palette, DEFAULT_PALETTE};

fn assigner() -> ColorAssigner {
    ColorAssigner::new(Palette::default(), Duration::from_secs(1)).expect("valid assigner")
}

#[test]
fn complete_flow_with_system_clock() {
    let mut assigner = assigner();

    assert_eq!(assigner.color_for("Ammoniak"), Ok(DEFAULT_PALETTE[0]));
    assert_eq!(assigner.color_for("Benzol"), Ok(DEFAULT_PALETTE[1]));
    assert_eq!(assigner.color_for("Aceton"), Ok(DEFAULT_PALETTE[2]));
    sleep(Duration::from_millis(700));
    assert_eq!(assigner.color_for("Benzol"), Ok(DEFAULT_PALETTE[1]));
    sleep(Duration::from_millis(700));
    assert_eq!(assigner.color_for("Benzol"), Ok(DEFAULT_PALETTE[1]));
    assert_eq!(assigner.color_for("Aceton"), Ok(DEFAULT_PALETTE[0]));

    let legend = assigner.current_assignments();
    let labels: Vec<&str> = legend.keys().map(String::as_str).collect();
    assert_eq!(labels, ["Benzol", "Aceton"]);
}

#[test]
fn assigns_available_color_after_expiration() {
    let mut assigner = assigner();

    assert_eq!(assigner.color_for("Ammoniak"), Ok(DEFAULT_PALETTE[0]));
    assert_eq!(assigner.color_for("Benzol"), Ok(DEFAULT_PALETTE[1]));
    sleep(Duration::from_millis(1_100));
    assert_eq!(assigner.color_for("Aceton"), Ok(DEFAULT_PALETTE[0]));
}

#[test]
fn no_available_colors_for_new_compound() {
    let mut assigner = assigner();

    for label in ["Ammoniak", "Benzol", "Aceton", "Kohlenmonoxid", "Chloroform"] {
        assigner.color_for(label).expect("palette has room");
    }

    assert_eq!(
        assigner.color_for("Methanol"),
        Err(AssignError::ExhaustedPalette { capacity: 5 })
    );
    assert_eq!(assigner.current_assignments().len(), 5);
}

#[test]
fn from_config_builds_system_clock_assigner() {
    let mut assigner =
        ColorAssigner::from_config(&AssignerConfig::default()).expect("default config");

    assert_eq!(assigner.timeout(), Duration::from_secs(1));
    assert_eq!(assigner.color_for("Ammoniak"), Ok(DEFAULT_PALETTE[0]));
    assert!(assigner.is_assigned("Ammoniak"));
}
