pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;

pub use provider::LLMProvider;
pub use openai::OpenAICompatProvider;
pub use prompts::{CompletionRequest, Creativity, PromptTemplates};
pub use parser::{parse_json_response, parse_structured};
