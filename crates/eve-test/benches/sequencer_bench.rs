//! Benchmarks for sequencer transitions and full simulated visits

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eve_core::Channel;
use eve_playlist::parse_document;
use eve_sequencer::{Sequencer, SequencerConfig, SequencerState};
use eve_test::{
    first_visit_script, run_script, sample_playlists, Simulation, VisitorChaos, VisitorChaosConfig, SAMPLE_DOCUMENT,
};

fn bench_parse_document(c: &mut Criterion) {
    c.bench_function("parse_document", |b| {
        b.iter(|| black_box(parse_document(black_box(SAMPLE_DOCUMENT))))
    });
}

fn bench_advance_reveal(c: &mut Criterion) {
    let seq = Sequencer::new(SequencerConfig::default(), sample_playlists());
    let state = SequencerState::default();

    c.bench_function("advance_and_reveal", |b| {
        let mut index = 0usize;
        b.iter(|| {
            index = (index + 1) % 3;
            let t = seq.advance_to(&state, Channel::Primary, index);
            let revealed = match t.state.reveal_timer {
                Some(token) => seq.on_timer(&t.state, token),
                None => t,
            };
            black_box(revealed.effects.len())
        })
    });
}

fn bench_toggle(c: &mut Criterion) {
    let seq = Sequencer::new(SequencerConfig::default(), sample_playlists());
    let mut state = seq.start_experience(&SequencerState::default()).state;

    c.bench_function("toggle_play_pause", |b| {
        b.iter(|| {
            state = seq.toggle_play_pause(black_box(&state)).state;
        })
    });
}

fn bench_first_visit(c: &mut Criterion) {
    c.bench_function("first_visit_script", |b| {
        let script = first_visit_script();
        b.iter(|| {
            let mut sim = Simulation::sample();
            let violations = run_script(&mut sim, &script);
            sim.advance_by(Duration::from_secs(60));
            black_box((violations.len(), sim.phase()))
        })
    });
}

fn bench_chaos_visitor(c: &mut Criterion) {
    let mut group = c.benchmark_group("chaos_visitor");
    group.sample_size(20);
    group.bench_function("frantic", |b| {
        b.iter(|| black_box(VisitorChaos::new(VisitorChaosConfig::frantic()).run().actions))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_document,
    bench_advance_reveal,
    bench_toggle,
    bench_first_visit,
    bench_chaos_visitor,
);
criterion_main!(benches);
