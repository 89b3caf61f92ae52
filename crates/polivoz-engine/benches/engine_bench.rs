//! Criterion benchmarks for the polivoz engine hot path
//!
//! Run with: cargo bench -p polivoz-engine

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polivoz_core::{ControlStore, ControlTag};
use polivoz_engine::{
    DestAccumulators, Engine, ModLayer, ModMatrix, ModSource, NoteEvent, NoteEventKind,
    SharedSources, SourceView, VoiceSources,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn chord(engine: &mut Engine<16>, notes: &[u8]) {
    for &note in notes {
        engine.queue_note_event(NoteEvent {
            kind: NoteEventKind::NoteOn { velocity: 100 },
            note,
            channel: 0,
            offset: 0,
        });
    }
}

// ============================================================================
// Matrix evaluation
// ============================================================================

fn bench_matrix_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ModMatrix");

    let matrix = ModMatrix::default_rows();
    let mut controls = ControlStore::new();
    controls.set(ControlTag::Lfo1PitchIntensity, 0.5);
    controls.set(ControlTag::Lfo2CutoffIntensity, 0.5);
    controls.set(ControlTag::KeytrackIntensity, 1.0);

    let mut shared = SharedSources::new();
    shared.set(ModSource::Lfo1, 0.3);
    shared.set(ModSource::Lfo2, -0.7);
    let mut voice = VoiceSources::new();
    voice.set(ModSource::Velocity, 100.0);
    voice.set(ModSource::NoteNumber, 64.0);
    voice.set(ModSource::Eg1, 0.8);
    voice.set(ModSource::Eg2, 0.5);

    group.bench_function("both_layers", |b| {
        let mut acc = DestAccumulators::new();
        b.iter(|| {
            acc.reset();
            let view = SourceView::new(&shared, &voice);
            matrix.evaluate(ModLayer::NoteScaling, &view, &controls, &mut acc);
            matrix.evaluate(ModLayer::AudioRate, &view, &controls, &mut acc);
            black_box(acc.get(polivoz_engine::ModDest::FilterCutoff))
        })
    });

    group.finish();
}

// ============================================================================
// Full engine render
// ============================================================================

fn bench_engine_idle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine_Idle");

    for &block_size in BLOCK_SIZES {
        let mut engine: Engine<16> = Engine::new(SAMPLE_RATE);
        let mut left = vec![0.0f32; block_size];
        let mut right = vec![0.0f32; block_size];

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    let silent = engine.render(&mut left, &mut right);
                    black_box(silent)
                })
            },
        );
    }

    group.finish();
}

fn bench_engine_chord(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine_8VoiceChord");

    for &block_size in BLOCK_SIZES {
        let mut engine: Engine<16> = Engine::new(SAMPLE_RATE);
        engine.queue_control(ControlTag::Lfo1PitchIntensity, 0.5, polivoz_core::ControlOrigin::Ui);
        engine.queue_control(ControlTag::Lfo2CutoffIntensity, 0.5, polivoz_core::ControlOrigin::Ui);
        chord(&mut engine, &[48, 52, 55, 60, 64, 67, 72, 76]);
        let mut left = vec![0.0f32; block_size];
        let mut right = vec![0.0f32; block_size];
        engine.render(&mut left, &mut right);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    engine.render(&mut left, &mut right);
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_engine_full_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine_16Voice");

    let block_size = 256;
    let mut engine: Engine<16> = Engine::new(SAMPLE_RATE);
    for i in 0..16u8 {
        engine.queue_note_event(NoteEvent {
            kind: NoteEventKind::NoteOn { velocity: 100 },
            note: 36 + i * 3,
            channel: 0,
            offset: 0,
        });
    }
    let mut left = vec![0.0f32; block_size];
    let mut right = vec![0.0f32; block_size];
    engine.render(&mut left, &mut right);

    group.bench_function("render_256", |b| {
        b.iter(|| {
            engine.render(&mut left, &mut right);
            black_box(left[0])
        })
    });

    group.finish();
}

fn bench_voice_stealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine_VoiceStealing");

    group.bench_function("12_notes_8_voices", |b| {
        let mut engine: Engine<16> = Engine::new(SAMPLE_RATE);
        let mut left = vec![0.0f32; 64];
        let mut right = vec![0.0f32; 64];

        b.iter(|| {
            for i in 0..12u8 {
                engine.queue_note_event(NoteEvent {
                    kind: NoteEventKind::NoteOn { velocity: 100 },
                    note: 48 + i * 2,
                    channel: 0,
                    offset: 0,
                });
                engine.render(&mut left, &mut right);
            }
            engine.all_notes_off();
            black_box(left[0])
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_matrix_evaluation,
    bench_engine_idle,
    bench_engine_chord,
    bench_engine_full_polyphony,
    bench_voice_stealing,
);

criterion_main!(benches);
