//! CLI operation mode handlers.
//!
//! This module contains the implementations for different operation modes:
//! - [`show_discussion`]: Load a discussion and print its comment tree
//! - [`create_discussion`]: Create a discussion through the GraphQL API
//! - [`embed_snippet`]: Print the embed `<script>` tag
//!
//! Output formatting utilities are in [`output`].

pub mod create_discussion;
pub mod embed_snippet;
pub mod output;
pub mod show_discussion;
