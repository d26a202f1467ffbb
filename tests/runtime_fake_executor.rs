// tests/runtime_fake_executor.rs

use std::error::Error;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use trigseq::engine::{
    CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason,
    TriggerWhileRunningBehaviour,
};
use trigseq::sequencer::Sequencer;
use trigseq_test_utils::builders::SequencerBuilder;
use trigseq_test_utils::fake_executor::RecordingExecutor;
use trigseq_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn trigger() -> RuntimeEvent {
    RuntimeEvent::Triggered {
        reason: TriggerReason::Detection,
    }
}

/// Spawn a runtime over `sequencer` and return its sender and join handle.
fn spawn_runtime(
    sequencer: Sequencer,
    executor: RecordingExecutor,
    behaviour: TriggerWhileRunningBehaviour,
    queue_length: usize,
    exit_when_idle: bool,
) -> (
    mpsc::Sender<RuntimeEvent>,
    JoinHandle<trigseq::errors::Result<()>>,
) {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let core = CoreRuntime::new(behaviour, queue_length, RuntimeOptions { exit_when_idle });
    let runtime = Runtime::new(core, rt_rx, &rt_tx, sequencer, executor);
    (rt_tx, tokio::spawn(runtime.run()))
}

#[tokio::test(start_paused = true)]
async fn single_trigger_runs_every_slot_then_exits() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["lamp on", "", "amp on"])
        .delay_ms(100)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq.clone(),
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        true,
    );

    tx.send(trigger()).await?;

    with_timeout(Duration::from_secs(3), handle).await??;

    assert_eq!(exec.commands(), vec!["lamp on", "amp on"]);
    assert!(seq.is_triggered());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn disabled_sequencer_ignores_trigger() -> TestResult {
    let seq = SequencerBuilder::new()
        .commands(&["a", "b"])
        .enabled(false)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq.clone(),
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        true,
    );

    tx.send(trigger()).await?;
    with_timeout(Duration::from_secs(3), handle).await??;

    assert!(exec.commands().is_empty());
    assert!(!seq.is_triggered());
    assert_eq!(seq.status().state_label(), "Disabled");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn overlapping_triggers_are_serialized_and_capped() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["a", "b"])
        .delay_ms(1000)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        true,
    );

    // Three triggers before the first run can finish: one runs, one is
    // queued, one is dropped.
    tx.send(trigger()).await?;
    tx.send(trigger()).await?;
    tx.send(trigger()).await?;

    with_timeout(Duration::from_secs(10), handle).await??;

    assert_eq!(exec.commands(), vec!["a", "b", "a", "b"]);

    // Runs never interleave: the second run starts after the first ends.
    let calls = exec.calls();
    assert!(calls[2].at >= calls[1].at);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn longer_queue_keeps_more_runs() -> TestResult {
    let seq = SequencerBuilder::new()
        .commands(&["a"])
        .delay_ms(0)
        .build();
    let exec = RecordingExecutor::new().busy_for(Duration::from_millis(100));
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        3,
        true,
    );

    for _ in 0..5 {
        tx.send(trigger()).await?;
    }

    with_timeout(Duration::from_secs(10), handle).await??;

    assert_eq!(exec.commands(), vec!["a", "a", "a", "a"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_behaviour_restarts_from_first_slot() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["a", "b", "c"])
        .delay_ms(1000)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Cancel,
        1,
        true,
    );

    tx.send(trigger()).await?;
    // Let run 1 execute "a" and start waiting.
    tokio::time::sleep(Duration::from_millis(500)).await;
    tx.send(trigger()).await?;

    with_timeout(Duration::from_secs(10), handle).await??;

    assert_eq!(exec.commands(), vec!["a", "a", "b", "c"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn disabling_mid_run_does_not_stop_it() -> TestResult {
    let seq = SequencerBuilder::new()
        .commands(&["a", "b"])
        .delay_ms(1000)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq.clone(),
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        true,
    );

    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    seq.set_enabled(false);

    with_timeout(Duration::from_secs(10), handle).await??;

    assert_eq!(exec.commands(), vec!["a", "b"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_wait_and_joins_run() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["a", "b"])
        .delay_ms(60_000)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        false,
    );

    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let start = tokio::time::Instant::now();
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(Duration::from_secs(3), handle).await??;

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(exec.commands(), vec!["a"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_stays_up_between_triggers() -> TestResult {
    let seq = SequencerBuilder::new()
        .commands(&["a"])
        .delay_ms(0)
        .build();
    let exec = RecordingExecutor::new();
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        false,
    );

    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(exec.commands(), vec!["a", "a"]);

    // Dropping the last sender closes the channel and ends the runtime.
    drop(tx);
    with_timeout(Duration::from_secs(3), handle).await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn panicking_executor_releases_the_active_run() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["boom", "b"])
        .delay_ms(100)
        .build();
    let exec = RecordingExecutor::new().panic_on("boom");
    let (tx, handle) = spawn_runtime(
        seq,
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        true,
    );

    // The second trigger is queued behind the first run, which dies.
    tx.send(trigger()).await?;
    tx.send(trigger()).await?;

    // Exiting at all proves the core saw both runs finish.
    with_timeout(Duration::from_secs(3), handle).await??;

    assert_eq!(exec.commands(), vec!["boom", "boom"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_keeps_serving_triggers_after_a_panicked_run() -> TestResult {
    let seq = SequencerBuilder::new()
        .commands(&["boom"])
        .delay_ms(0)
        .build();
    let exec = RecordingExecutor::new().panic_on("boom");
    let (tx, handle) = spawn_runtime(
        seq.clone(),
        exec.clone(),
        TriggerWhileRunningBehaviour::Queue,
        1,
        false,
    );

    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    seq.set_command(1, "fine")?;
    tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(exec.commands(), vec!["boom", "fine"]);

    drop(tx);
    with_timeout(Duration::from_secs(3), handle).await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn force_stop_aborts_command_still_running_at_shutdown() -> TestResult {
    init_tracing();

    let seq = SequencerBuilder::new()
        .commands(&["slow", "next"])
        .delay_ms(0)
        .build();
    let exec = RecordingExecutor::new().busy_for(Duration::from_secs(600));

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let (force_tx, force_rx) = watch::channel(false);
    let core = CoreRuntime::new(
        TriggerWhileRunningBehaviour::Queue,
        1,
        RuntimeOptions::default(),
    );
    let runtime =
        Runtime::new(core, rt_rx, &rt_tx, seq, exec.clone()).with_force_stop(force_rx);
    let handle = tokio::spawn(runtime.run());

    rt_tx.send(trigger()).await?;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let start = tokio::time::Instant::now();
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;
    force_tx.send_replace(true);

    with_timeout(Duration::from_secs(5), handle).await??;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(exec.commands(), vec!["slow"]);
    Ok(())
}
