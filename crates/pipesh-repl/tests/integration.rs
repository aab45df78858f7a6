//! Integration tests for the pipesh REPL.
//!
//! These tests feed lines through the REPL and verify responses and the
//! lines its pipelines deliver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pipesh_kernel::{CollectSink, JobId, JobStatus, KernelConfig};
use pipesh_repl::{Repl, Response};
use rstest::rstest;
use tokio::runtime::{Builder, Runtime};

fn current_thread() -> Runtime {
    Builder::new_current_thread().enable_all().build().expect("runtime")
}

fn multi_thread() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("runtime")
}

fn repl_on(runtime: Runtime) -> (Repl, CollectSink) {
    let sink = CollectSink::new();
    let repl = Repl::with_runtime(KernelConfig::named("test"), runtime, Arc::new(sink.clone()));
    (repl, sink)
}

/// Run lines through one REPL and collect the printed responses.
fn run_script(repl: &mut Repl, script: &str) -> Vec<String> {
    let mut outputs = Vec::new();
    for line in script.lines() {
        match repl.process_line(line) {
            Response::Continue(Some(output)) => outputs.push(output),
            Response::Continue(None) => {}
            Response::Exit => break,
        }
    }
    outputs
}

fn output(response: Response) -> Option<String> {
    match response {
        Response::Continue(output) => output,
        Response::Exit => panic!("unexpected exit"),
    }
}

fn wait_for(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(5));
    }
}

// ============================================================================
// Foreground
// ============================================================================

#[test]
fn test_foreground_pipeline_output() {
    let (mut repl, sink) = repl_on(current_thread());
    let outputs = run_script(&mut repl, "echo hello | uppercase\necho a b c | wc");
    assert!(outputs.is_empty(), "{:?}", outputs);
    assert_eq!(sink.lines(), vec!["HELLO", "1 3 5"]);
}

#[test]
fn test_lines_after_exit_are_not_run() {
    let (mut repl, sink) = repl_on(current_thread());
    run_script(&mut repl, "echo before\nexit\necho after");
    assert_eq!(sink.lines(), vec!["before"]);
}

#[rstest]
#[case::unknown("frob", "The command [frob] was not found.")]
#[case::unknown_later("echo x | frob -v", "The command [frob -v] was not found.")]
#[case::filter_first("uppercase", "The command [uppercase] requires input.")]
#[case::source_later("echo a | pwd", "The command [pwd] cannot have an input.")]
#[case::missing_file("cat /definitely/not/here", "At least one of the files in the command [cat /definitely/not/here] was not found.")]
#[case::grep_no_pattern("echo a | grep", "The command [grep] requires parameter(s).")]
#[case::background_error("frob &", "The command [frob] was not found.")]
fn test_construction_errors(#[case] line: &str, #[case] expected: &str) {
    let (mut repl, _sink) = repl_on(current_thread());
    assert_eq!(output(repl.process_line(line)).as_deref(), Some(expected));
    assert!(repl.kernel().jobs().is_empty());
}

// ============================================================================
// Job control
// ============================================================================

#[rstest]
#[case::missing("kill", "The command [kill] requires parameter(s).")]
#[case::missing_with_space("kill   ", "The command [kill] requires parameter(s).")]
#[case::not_a_number("kill one", "The command [kill] requires parameter(s).")]
#[case::negative("kill -1", "The command [kill] requires parameter(s).")]
#[case::zero("kill 0", "The parameter for the command [kill 0] is invalid.")]
#[case::beyond("kill 3", "The parameter for the command [kill 3] is invalid.")]
fn test_kill_argument_errors(#[case] line: &str, #[case] expected: &str) {
    let (mut repl, _sink) = repl_on(current_thread());
    run_script(&mut repl, "sleep 10 &\nsleep 10 &");

    assert_eq!(output(repl.process_line(line)).as_deref(), Some(expected));
    // Nothing was interrupted.
    let statuses: Vec<JobStatus> = repl.kernel().jobs().list().into_iter().map(|j| j.status).collect();
    assert_eq!(statuses, vec![JobStatus::Running, JobStatus::Running]);
}

#[test]
fn test_repl_jobs_lists_in_launch_order() {
    // On a current-thread runtime the jobs cannot run before repl_jobs.
    let (mut repl, _sink) = repl_on(current_thread());
    let outputs = run_script(&mut repl, "echo x &\necho y &\nrepl_jobs");
    assert_eq!(outputs, vec!["\t1. echo x &\n\t2. echo y &"]);
}

#[test]
fn test_repl_jobs_skips_finished_jobs() {
    let (mut repl, sink) = repl_on(multi_thread());
    run_script(&mut repl, "echo x &\nsleep 10 &");

    let jobs = repl.kernel().jobs();
    wait_for(|| jobs.get(JobId(1)).map(|j| j.status) == Some(JobStatus::Done));

    assert_eq!(output(repl.process_line("repl_jobs")).as_deref(), Some("\t2. sleep 10 &"));
    assert_eq!(sink.lines(), vec!["x"]);

    assert_eq!(repl.process_line("kill 2"), Response::Continue(None));
    assert_eq!(repl.process_line("repl_jobs"), Response::Continue(None));
    assert_eq!(jobs.get(JobId(2)).map(|j| j.status), Some(JobStatus::Interrupted));
}

#[test]
fn test_background_job_does_not_block_the_loop() {
    let (mut repl, _sink) = repl_on(multi_thread());
    let started = Instant::now();
    assert_eq!(repl.process_line("sleep 30 &"), Response::Continue(None));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(repl.kernel().jobs().running_count(), 1);
    repl.process_line("kill 1");
}

#[test]
fn test_killed_pipeline_never_reports() {
    let (mut repl, sink) = repl_on(multi_thread());
    run_script(&mut repl, "sleep 10 | uppercase | wc &\nkill 1");
    std::thread::sleep(Duration::from_millis(50));
    assert!(sink.lines().is_empty());
    assert_eq!(repl.process_line("repl_jobs"), Response::Continue(None));
}

#[test]
fn test_background_output_arrives_while_waiting_in_foreground() {
    // The current-thread runtime only drives background jobs during block_on.
    let (mut repl, sink) = repl_on(current_thread());
    run_script(&mut repl, "echo bg &\nsleep 0.05");
    assert_eq!(sink.lines(), vec!["bg"]);
}
