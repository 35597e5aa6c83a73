//! candor-agent - generative-language adapter for candor
//!
//! Translates interview context into structured generation and evaluation
//! calls: prompt construction, a process-wide admission gate in front of
//! the provider, retry with exponential backoff, and tolerant parsing of
//! model responses into domain objects.

pub mod admission;
pub mod adapter;
pub mod client;
pub mod extract;
pub mod prompts;

pub use adapter::{InterviewAgentClient, MAX_RETRIES};
pub use admission::{AdmissionGate, GatePermit, MAX_CONCURRENT, MIN_INTERVAL};
pub use client::{GeminiClient, GenerativeClient};
pub use extract::{ExtractError, Extracted, Strategy, extract_json};
