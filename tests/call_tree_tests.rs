use engine_trace_studio::aggregator::{flatten, CallTree, FlattenMode};
use engine_trace_studio::parser::Sample;
use engine_trace_studio::utils::config::CONTAINMENT_EPSILON;
use pretty_assertions::assert_eq;

fn sample(start: f64, elapsed: f64, name: &str) -> Sample {
    let scope = name.split('.').next().unwrap_or_default();
    Sample {
        scope_name: scope.to_string(),
        name: name.to_string(),
        start,
        elapsed,
        arg: None,
        thread_id: 0,
    }
}

fn engine_frame() -> Vec<Sample> {
    vec![
        sample(0.001, 15.936, "Engine.Frame"),
        sample(0.023, 0.398, "Engine.Sim"),
        sample(0.422, 15.515, "Graphics.Flip"),
    ]
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= CONTAINMENT_EPSILON,
        "{} is not within {} of {}",
        actual,
        CONTAINMENT_EPSILON,
        expected
    );
}

#[test]
fn test_engine_frame_containment() {
    let tree = CallTree::build(&engine_frame());

    assert_eq!(tree.top_level().len(), 1);
    let frame = &tree[tree.top_level()[0]];
    assert_eq!(frame.name, "Engine.Frame");
    assert_eq!(frame.children().len(), 2);

    let sim = &tree[frame.children()[0]];
    let flip = &tree[frame.children()[1]];
    assert_eq!(sim.name, "Engine.Sim");
    assert_eq!(flip.name, "Graphics.Flip");
    assert!(sim.children().is_empty());
    assert!(flip.children().is_empty());

    assert_close(frame.self_time, 0.023);
    assert_close(sim.self_time, 0.398);
    assert_close(flip.self_time, 15.515);

    // Exact, not approximate
    assert_eq!(frame.elapsed, frame.self_time + sim.self_time + flip.self_time);
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_nested_resource_load() {
    let samples = vec![
        sample(504.441, 0.560, "Resource.Load"),
        sample(504.479, 0.024, "DDF.LoadMessage"),
        sample(504.515, 0.472, "Resource.Get"),
        sample(504.523, 0.464, "Resource.Load"),
    ];
    let tree = CallTree::build(&samples);

    assert_eq!(tree.top_level().len(), 1);
    let load = &tree[tree.top_level()[0]];
    assert_eq!(load.children().len(), 2);

    let message = &tree[load.children()[0]];
    let get = &tree[load.children()[1]];
    assert_eq!(message.name, "DDF.LoadMessage");
    assert!(message.children().is_empty());
    assert_eq!(get.name, "Resource.Get");
    assert_eq!(get.children().len(), 1);

    let inner = get.children()[0];
    assert_eq!(tree[inner].name, "Resource.Load");
    assert_eq!(tree.depth(inner), 2);
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_flatten_order() {
    let mut tree = CallTree::build(&engine_frame());

    let names: Vec<String> = flatten(&mut tree, FlattenMode::Preserve)
        .into_iter()
        .map(|s| s.name)
        .collect();

    assert_eq!(names, vec!["Engine.Frame", "Engine.Sim", "Graphics.Flip"]);
}

#[test]
fn test_root_spans_top_level_nodes() {
    let samples = vec![
        sample(2.0, 1.0, "Engine.Update"),
        sample(5.0, 2.0, "Graphics.Render"),
    ];
    let tree = CallTree::build(&samples);
    let root = tree.root();

    assert_eq!(root.name, "Root.Root");
    assert_eq!(root.start, 2.0);
    assert_eq!(root.end, 7.0);
    assert_eq!(root.elapsed, 5.0);
    assert_eq!(root.self_time, 2.0);
    assert_eq!(tree.top_level().len(), 2);
}

#[test]
fn test_empty_frame() {
    let mut tree = CallTree::build(&[]);

    assert!(tree.is_empty());
    assert_eq!(tree.root().elapsed, 0.0);
    assert_eq!(tree.root().self_time, 0.0);
    assert!(flatten(&mut tree, FlattenMode::Consume).is_empty());
}

#[test]
fn test_consume_leaves_nothing_to_walk() {
    let mut tree = CallTree::build(&engine_frame());

    let first = flatten(&mut tree, FlattenMode::Consume);
    let second = flatten(&mut tree, FlattenMode::Consume);

    assert_eq!(first.len(), 3);
    assert!(second.is_empty());
}

#[test]
fn test_deeply_nested_frame_decodes_and_builds() {
    use engine_trace_studio::parser::encode::{encode_frame, encode_string_table, RawSample};
    use engine_trace_studio::parser::{decode_frame, decode_string_table, DecodeOptions, SampleLayout};

    let n: u32 = 100_000;
    let raw: Vec<RawSample> = (0..n)
        .map(|i| RawSample {
            name_id: 2,
            scope_id: 1,
            start_ticks: i,
            elapsed_ticks: 2 * (n - i),
            ..Default::default()
        })
        .collect();
    let table = decode_string_table(&encode_string_table(&[(1, "Engine"), (2, "Nest")]).unwrap()).unwrap();
    let chunk = encode_frame(SampleLayout::RevisionB, &raw, &[], &[]).unwrap();

    let frame = decode_frame(&chunk, &table, &DecodeOptions::default()).unwrap();
    let mut tree = CallTree::build(&frame.samples);

    assert_eq!(tree.len(), n as usize);
    assert_eq!(tree.top_level().len(), 1);
    assert!(tree.diagnostics().is_empty());

    let flat = flatten(&mut tree, FlattenMode::Consume);
    assert_eq!(flat.len(), n as usize);
    assert_eq!(flat.last().map(|s| s.depth), Some(n as usize - 1));
}
