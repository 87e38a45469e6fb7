use super::*;

fn sample_history() -> History {
    let mut history = History::new();
    for (epoch, (loss, acc, val_loss, val_acc)) in [
        (2.1, 0.21, 1.95, 0.28),
        (1.8, 0.33, 1.70, 0.37),
        (1.6, 0.41, 1.75, 0.36),
    ]
    .into_iter()
    .enumerate()
    {
        history.push(EpochMetrics {
            epoch,
            loss,
            accuracy: acc,
            val_loss: Some(val_loss),
            val_accuracy: Some(val_acc),
        });
    }
    history.best_epoch = history.lowest_monitored_epoch();
    history
}

#[test]
fn test_history_series_accessors() {
    let history = sample_history();

    assert_eq!(history.len(), 3);
    assert!(!history.is_empty());
    assert_eq!(history.losses(), vec![2.1, 1.8, 1.6]);
    assert_eq!(history.accuracies(), vec![0.21, 0.33, 0.41]);
    assert_eq!(history.val_losses(), vec![Some(1.95), Some(1.70), Some(1.75)]);
    assert_eq!(history.last().map(|m| m.epoch), Some(2));
}

#[test]
fn test_history_lowest_monitored_epoch() {
    let history = sample_history();
    assert_eq!(history.lowest_monitored_epoch(), Some(1));

    // Without validation data the training loss is monitored; NaN is skipped
    let mut history = History::new();
    for (epoch, loss) in [1.0, f32::NAN, 0.4, 0.6].into_iter().enumerate() {
        history.push(EpochMetrics {
            epoch,
            loss,
            accuracy: 0.5,
            val_loss: None,
            val_accuracy: None,
        });
    }
    assert_eq!(history.lowest_monitored_epoch(), Some(2));
    assert_eq!(History::new().lowest_monitored_epoch(), None);
}

#[test]
fn test_history_metrics_table() {
    let mut history = sample_history();
    history.stop_reason = StopReason::Patience;
    let table = history.metrics_table();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 5);
    for column in ["epoch", "loss", "accuracy", "val_loss", "val_accuracy"] {
        assert!(lines[0].contains(column));
    }
    // Epochs are shown 1-based, best epoch is marked
    assert!(lines[2].trim_start().starts_with('2'));
    assert!(lines[2].ends_with(" *"));
    assert!(!lines[1].ends_with(" *"));
    assert!(lines[1].contains("2.1000"));
    assert!(lines[1].contains("0.2800"));
    assert_eq!(lines[4], "stopped: early stopping, best epoch: 2");
}

#[test]
fn test_history_metrics_table_without_validation() {
    let mut history = History::new();
    history.push(EpochMetrics {
        epoch: 0,
        loss: 0.5,
        accuracy: 0.75,
        val_loss: None,
        val_accuracy: None,
    });
    let table = history.metrics_table();

    assert!(table.lines().nth(1).unwrap().trim_end().ends_with('-'));
    assert!(table.ends_with("stopped: epoch budget exhausted"));
}

#[test]
fn test_history_render_chart_layout() {
    let history = sample_history();
    let chart = history.render_chart(11, 30);
    let lines: Vec<&str> = chart.lines().collect();

    // 11 plot rows, axis, epoch labels, legend
    assert_eq!(lines.len(), 14);
    assert!(lines[0].starts_with(" 1.0 ┤"));
    assert!(lines[5].starts_with(" 0.5 ┤"));
    assert!(lines[10].starts_with(" 0.0 ┤"));
    assert!(lines[11].contains('└'));
    assert!(lines[12].contains("(epoch)"));
    for label in ["● loss", "■ accuracy", "○ val_loss", "□ val_accuracy"] {
        assert!(lines[13].contains(label));
    }

    // Losses above 1 sit on the top border
    let top_row: String = lines[0].chars().skip(6).collect();
    assert!(top_row.contains('○') || top_row.contains('●'));
    // Every plot row has the requested width
    for line in &lines[..11] {
        assert_eq!(line.chars().count(), 6 + 30);
    }
}

#[test]
fn test_history_render_chart_legend_skips_missing_series() {
    let mut history = History::new();
    history.push(EpochMetrics {
        epoch: 0,
        loss: 0.3,
        accuracy: 0.9,
        val_loss: None,
        val_accuracy: None,
    });
    let chart = history.render_chart(5, 10);
    let legend = chart.lines().last().unwrap();

    assert!(legend.contains("● loss"));
    assert!(!legend.contains("val_loss"));
    assert_eq!(History::new().render_chart(5, 10), "(no epochs recorded)");
}

#[test]
fn test_history_json_round_trip() {
    let mut history = sample_history();
    history.stop_reason = StopReason::Patience;

    let path = std::env::temp_dir().join(format!("cifar_dnn_history_{}.json", std::process::id()));
    let path = path.to_string_lossy().to_string();

    history.save_to_path(&path).unwrap();
    let loaded = History::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, history);
    assert!(History::load_from_path("/nonexistent/cifar_dnn/history.json").is_err());
}

#[test]
fn test_history_with_non_finite_metrics_loads_back() {
    let mut history = History::new();
    history.push(EpochMetrics {
        epoch: 0,
        loss: 2.3,
        accuracy: 0.1,
        val_loss: Some(f32::INFINITY),
        val_accuracy: Some(0.1),
    });
    history.push(EpochMetrics {
        epoch: 1,
        loss: f32::NAN,
        accuracy: 0.1,
        val_loss: Some(f32::NAN),
        val_accuracy: None,
    });

    let path = std::env::temp_dir().join(format!("cifar_dnn_history_nan_{}.json", std::process::id()));
    let path = path.to_string_lossy().to_string();
    history.save_to_path(&path).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    let loaded = History::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(saved.contains("\"NaN\""));
    assert!(saved.contains("\"inf\""));
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.epochs[0].loss, 2.3);
    assert_eq!(loaded.epochs[0].val_loss, Some(f32::INFINITY));
    assert!(loaded.epochs[1].loss.is_nan());
    assert!(loaded.epochs[1].val_loss.unwrap().is_nan());
    assert_eq!(loaded.epochs[1].val_accuracy, None);
}

#[test]
fn test_epoch_metrics_null_loss_reads_as_nan() {
    let metrics: EpochMetrics =
        serde_json::from_str(r#"{ "epoch": 3, "loss": null, "accuracy": 0.5, "val_loss": null }"#).unwrap();
    assert!(metrics.loss.is_nan());
    assert_eq!(metrics.val_loss, None);
    assert_eq!(metrics.val_accuracy, None);

    assert!(serde_json::from_str::<EpochMetrics>(r#"{ "epoch": 0, "loss": "big", "accuracy": 0.5 }"#).is_err());
}
