//! Benchmarks for request compilation performance
//!
//! This benchmark measures:
//! - CompletionRequest to `/chat/completions` body compilation
//! - Strict schema derivation from Rust types
//! - Parsing and validating structured model output

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use llm_patterns::client::{CompletionRequest, CompletionResult, ModelReply};
use llm_patterns::structured::{strict_schema_from_type, ResponseFormat, StructuredOutput};
use llm_patterns::types::{Message, ToolCall, ToolDefinition};
use llm_patterns::workflows::{ModifyEventDetails, NewEventDetails};
use serde_json::json;

fn weather_tool() -> ToolDefinition {
    ToolDefinition::function(
        "get_weather",
        "Get current temperature for provided coordinates in celsius.",
        json!({
            "type": "object",
            "properties": {"latitude": {"type": "number"}, "longitude": {"type": "number"}},
            "required": ["latitude", "longitude"],
            "additionalProperties": false
        }),
    )
    .strict(true)
}

fn create_simple_request() -> CompletionRequest {
    CompletionRequest::new(vec![Message::user("Hello, world!")])
        .temperature(0.7)
        .max_tokens(1000)
}

fn create_tool_request(turns: usize) -> CompletionRequest {
    let mut messages = vec![Message::system("You are a weather assistant.")];
    for i in 0..turns {
        let id = format!("call_{}", i);
        messages.push(Message::user("What is the weather like in Paris today?"));
        messages.push(Message::assistant_tool_calls(
            None,
            vec![ToolCall::new(
                id.clone(),
                "get_weather",
                json!({"latitude": 48.8566, "longitude": 2.3522}),
            )],
        ));
        messages.push(Message::tool(
            id,
            r#"{"temperature_2m": 18.3, "wind_speed_10m": 9.7}"#,
        ));
    }
    CompletionRequest::new(messages)
        .tools(vec![weather_tool()])
        .structured::<NewEventDetails>()
}

fn bench_request_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_compilation");

    let simple = create_simple_request();
    group.bench_function("simple_request", |b| {
        b.iter(|| black_box(simple.to_body("gpt-4o").unwrap()))
    });

    for turns in [1usize, 10, 50] {
        let request = create_tool_request(turns);
        group.throughput(Throughput::Elements(request.messages.len() as u64));
        group.bench_with_input(BenchmarkId::new("tool_history", turns), &request, |b, req| {
            b.iter(|| {
                req.validate().unwrap();
                black_box(req.to_body("gpt-4o").unwrap())
            })
        });
    }

    group.finish();
}

fn bench_schema_derivation(c: &mut Criterion) {
    c.bench_function("strict_schema_modify_event", |b| {
        b.iter(|| black_box(strict_schema_from_type::<ModifyEventDetails>()))
    });
}

fn bench_structured_parsing(c: &mut Criterion) {
    let request = CompletionRequest::new(vec![Message::user("Schedule it")])
        .response_format(ResponseFormat::for_type::<NewEventDetails>());
    let reply = ModelReply::text(
        r#"{"name": "Team meeting", "date": "2025-04-29T14:00:00", "duration_minutes": 60, "participants": ["Alice", "Bob"]}"#,
    );
    c.bench_function("interpret_structured_reply", |b| {
        b.iter(|| {
            black_box(CompletionResult::<NewEventDetails>::from_reply(
                &request, &reply,
            ))
        })
    });

    let fenced = "```json\n{\"name\": \"Team meeting\", \"date\": \"2025-04-29\"}\n```";
    c.bench_function("extract_fenced_json", |b| {
        b.iter(|| black_box(StructuredOutput::from_response_unvalidated(fenced)))
    });
}

criterion_group!(
    benches,
    bench_request_compilation,
    bench_schema_derivation,
    bench_structured_parsing
);
criterion_main!(benches);
