//! Local tools the model can invoke.
//!
//! A [`ToolRegistry`] holds the tools declared on a request and resolves the
//! invocations an assistant turn asks for. Built-ins:
//!
//! | Tool | Name |
//! |------|------|
//! | [`WeatherTool`] | `get_weather` |
//! | [`SearchKnowledgeTool`] | `search_knowledge` |
//! | [`FallbackAnswerTool`] | `fallback_answer` |

pub mod base;
pub mod knowledge;
pub mod registry;
pub mod weather;

pub use base::{parse_arguments, FnTool, Tool};
pub use knowledge::{FallbackAnswerTool, KnowledgeBase, KnowledgeRecord, SearchKnowledgeTool};
pub use registry::{resolve_tool_calls, ToolRegistry};
pub use weather::{WeatherArgs, WeatherTool};
