use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slidegrade_core::config::GradingConfig;
use slidegrade_core::document::{Document, Shape, Slide};
use slidegrade_core::engine::Grader;
use slidegrade_core::mapping::NameMapper;
use slidegrade_core::model::OperationPoint;
use slidegrade_core::params::Parameters;
use slidegrade_core::registry::DetectorRegistry;

fn make_deck(slides: usize) -> Document {
    Document::new(
        (1..=slides)
            .map(|i| {
                Slide::new(vec![
                    Shape::text_box(&format!("Slide {i} title")),
                    Shape::text_box(&format!("Body text for slide {i}")),
                    Shape::picture(),
                ])
                .with_layout("Title and Content")
                .with_transition(if i % 2 == 0 { "Fade" } else { "Push" })
            })
            .collect(),
    )
}

fn make_points(n: usize) -> Vec<OperationPoint> {
    (0..n)
        .map(|i| match i % 4 {
            0 => OperationPoint::new(format!("p{i}"), "InsertSlide", 1.0)
                .with_param("ExpectedSlideCount", "10"),
            1 => OperationPoint::new(format!("p{i}"), "幻灯片插入文本内容", 1.0)
                .with_param("TextContent", "slide 7"),
            2 => OperationPoint::new(format!("p{i}"), "SlideTransitionEffect", 1.0)
                .with_param("SlideNumbers", "1,2,3,4")
                .with_param("TransitionEffect", "Fade"),
            _ => OperationPoint::new(format!("p{i}"), "SetSlideLayout", 1.0)
                .with_param("SlideNumber", "3")
                .with_param("LayoutType", "Title and Content"),
        })
        .collect()
}

fn bench_name_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_mapping");
    let mapper = NameMapper::new();

    group.bench_function("display_name", |b| {
        b.iter(|| mapper.map(black_box("幻灯片切换效果")))
    });

    group.bench_function("substring_rule", |b| {
        b.iter(|| mapper.map(black_box("Check SlideTransitionSound on slide 2")))
    });

    group.bench_function("unmapped", |b| {
        b.iter(|| mapper.map(black_box("Something else entirely")))
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let registry = DetectorRegistry::with_defaults();
    let mapper = NameMapper::new();
    let deck = make_deck(30);

    let text_tag = mapper.map("InsertTextContent");
    let text_params = Parameters::new().with("TextContent", "Body text for slide 29");
    group.bench_function("text_search_30_slides", |b| {
        b.iter(|| registry.dispatch(black_box(&deck), &text_tag, &text_params))
    });

    let transition_tag = mapper.map("SlideTransitionEffect");
    let transition_params = Parameters::new()
        .with("SlideIndexes", "1,2,3,4,5,6,7,8,9,10")
        .with("TransitionType", "Fade");
    group.bench_function("transition_10_slides", |b| {
        b.iter(|| registry.dispatch(black_box(&deck), &transition_tag, &transition_params))
    });

    group.finish();
}

fn bench_evaluate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_batch");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deck.json");
    let json = serde_json::to_string(&make_deck(30)).expect("serialize deck");
    std::fs::write(&path, json).expect("write deck");

    let grader = Grader::json(GradingConfig::default());
    let small = make_points(8);
    let large = make_points(80);

    group.bench_function("8_points", |b| {
        b.iter(|| grader.evaluate_batch(black_box(&path), black_box(&small)))
    });

    group.bench_function("80_points", |b| {
        b.iter(|| grader.evaluate_batch(black_box(&path), black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, bench_name_mapping, bench_dispatch, bench_evaluate_batch);
criterion_main!(benches);
