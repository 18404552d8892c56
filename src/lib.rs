//! Client core for a feedback collection service.
//!
//! The [`repository::FeedbackRepository`] keeps one logical collection in sync
//! between the remote REST API ([`gateway`]) and a durable local copy
//! ([`storage`]); [`query`] filters, sorts and pages it; [`session_management`]
//! holds the logged-in user and supplies the bearer token.

pub mod analytics;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod feedback;
pub mod gateway;
pub mod query;
pub mod repository;
pub mod session_management;
pub mod storage;
