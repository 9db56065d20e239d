//! Blockwright agent: a tool-calling loop that lets a language model inspect
//! and edit a block world through its HTTP API.
//!
//! Layers, leaf first: [`world`] and [`memory`] hold the state the tools act
//! on, [`extensions`] exposes them as tools, [`llm`] talks to the model, and
//! [`agent_loop`] ties it together in an [`AgentSession`].

pub mod agent_loop;
pub mod conversation;
pub mod extensions;
pub mod llm;
pub mod memory;
pub mod types;
pub mod world;

#[cfg(test)]
mod testing;

pub use agent_loop::{AgentSession, Phase, StepOutcome};
pub use llm::{LlmClient, LlmGateway, ModelReply};
pub use world::{HttpWorldClient, WorldApi, WorldError};
