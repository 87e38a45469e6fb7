use super::*;

/// Feeds `losses` epoch by epoch and returns the epoch at which training stopped
fn run_until_stop(early_stopping: &mut EarlyStopping, losses: &[f32]) -> Option<usize> {
    for (epoch, &loss) in losses.iter().enumerate() {
        early_stopping.begin_epoch();
        let state = early_stopping.on_epoch_end(epoch, loss, || vec![SerializableLayerWeight::Empty]);
        if state == TrainingState::StoppedByPatience {
            return Some(epoch);
        }
    }
    early_stopping.finish_by_budget();
    None
}

#[test]
fn test_early_stopping_stops_patience_epochs_after_best() {
    let mut early_stopping = EarlyStopping::new(3, 0.0, true);
    let losses = [2.0, 1.5, 1.2, 1.3, 1.25, 1.21, 1.0, 0.9];

    assert_eq!(run_until_stop(&mut early_stopping, &losses), Some(5));
    assert_eq!(early_stopping.best_epoch(), Some(2));
    assert_relative_eq!(early_stopping.best_value(), 1.2);
    assert_eq!(early_stopping.wait(), 3);
    assert_eq!(early_stopping.state(), TrainingState::StoppedByPatience);
    assert!(early_stopping.state().is_terminal());
}

#[test]
fn test_early_stopping_runs_full_budget_while_improving() {
    let mut early_stopping = EarlyStopping::new(2, 0.0, false);
    let losses = [1.0, 0.9, 0.95, 0.8, 0.7];

    assert_eq!(run_until_stop(&mut early_stopping, &losses), None);
    assert_eq!(early_stopping.state(), TrainingState::StoppedByBudget);
    assert_eq!(early_stopping.best_epoch(), Some(4));
    assert_eq!(early_stopping.wait(), 0);
}

#[test]
fn test_early_stopping_min_delta_ignores_small_improvements() {
    let mut early_stopping = EarlyStopping::new(2, 0.05, false);
    // 0.98 and 0.96 are within min_delta of 1.0
    let losses = [1.0, 0.98, 0.96, 0.5];

    assert_eq!(run_until_stop(&mut early_stopping, &losses), Some(2));
    assert_eq!(early_stopping.best_epoch(), Some(0));
}

#[test]
fn test_early_stopping_negative_min_delta_uses_magnitude() {
    let early_stopping = EarlyStopping::new(1, -0.1, true);
    assert_relative_eq!(early_stopping.min_delta(), 0.1);
}

#[test]
fn test_early_stopping_snapshots_only_on_improvement_with_restore() {
    let mut calls = 0;
    let mut early_stopping = EarlyStopping::new(5, 0.0, true);
    for (epoch, loss) in [1.0, 1.1, 0.9, 0.95].into_iter().enumerate() {
        early_stopping.begin_epoch();
        early_stopping.on_epoch_end(epoch, loss, || {
            calls += 1;
            vec![SerializableLayerWeight::Empty; epoch + 1]
        });
    }
    assert_eq!(calls, 2);
    // Snapshot of epoch 2 holds three entries
    assert_eq!(early_stopping.best_weights().map(|w| w.len()), Some(3));

    let taken = early_stopping.take_best_weights();
    assert!(taken.is_some());
    assert!(early_stopping.best_weights().is_none());

    let mut calls_without_restore = 0;
    let mut no_restore = EarlyStopping::new(5, 0.0, false);
    no_restore.on_epoch_end(0, 1.0, || {
        calls_without_restore += 1;
        Vec::new()
    });
    assert_eq!(calls_without_restore, 0);
    assert!(no_restore.best_weights().is_none());
}

#[test]
fn test_early_stopping_nan_counts_as_no_improvement() {
    let mut early_stopping = EarlyStopping::new(1, 0.0, false);
    early_stopping.on_epoch_end(0, 1.0, Vec::new);
    let state = early_stopping.on_epoch_end(1, f32::NAN, Vec::new);

    assert_eq!(state, TrainingState::StoppedByPatience);
    assert_eq!(early_stopping.best_epoch(), Some(0));
}

#[test]
fn test_early_stopping_zero_patience_stops_on_first_plateau() {
    let mut early_stopping = EarlyStopping::new(0, 0.0, false);
    assert_eq!(run_until_stop(&mut early_stopping, &[1.0, 1.0, 0.5]), Some(1));
}

#[test]
fn test_early_stopping_terminal_state_is_sticky() {
    let mut early_stopping = EarlyStopping::new(1, 0.0, false);
    early_stopping.on_epoch_end(0, 1.0, Vec::new);
    early_stopping.on_epoch_end(1, 2.0, Vec::new);
    assert_eq!(early_stopping.state(), TrainingState::StoppedByPatience);

    early_stopping.begin_epoch();
    early_stopping.finish_by_budget();
    assert_eq!(
        early_stopping.on_epoch_end(2, 0.1, Vec::new),
        TrainingState::StoppedByPatience
    );
    assert_eq!(early_stopping.best_epoch(), Some(0));
}

#[test]
fn test_early_stopping_reset_clears_progress() {
    let mut early_stopping = EarlyStopping::default();
    assert_eq!(early_stopping.patience(), 5);
    assert!(early_stopping.restore_best_weights());

    early_stopping.on_epoch_end(0, 0.5, || vec![SerializableLayerWeight::Empty]);
    early_stopping.on_epoch_end(1, 0.7, Vec::new);
    early_stopping.reset();

    assert_eq!(early_stopping.best_value(), f32::INFINITY);
    assert_eq!(early_stopping.best_epoch(), None);
    assert_eq!(early_stopping.wait(), 0);
    assert!(early_stopping.best_weights().is_none());
    assert_eq!(early_stopping.state(), TrainingState::EpochInProgress);
}
