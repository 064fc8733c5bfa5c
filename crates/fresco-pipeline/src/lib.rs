//! The Fresco content pipeline and its external collaborators.
//!
//! Four stages, strictly sequential: [`content::ContentSource`] aggregates a
//! PR's comments and commit messages, [`prompt::PromptSynthesizer`] derives a
//! bounded image prompt from them, [`image::ImageSynthesizer`] turns the
//! prompt into an image locator, and [`publish::Publisher`] posts the result
//! back onto the PR. [`pipeline::Pipeline`] sequences the stages and guards
//! each output before advancing.
//!
//! The external seams are traits (`PrContentHost`, `TextCompleter`,
//! `ImageGenerator`, `CommentHost`) implemented by [`github::GitHubClient`]
//! and [`openai::OpenAiClient`] in production and by in-memory doubles in
//! tests.

pub mod content;
pub mod github;
pub mod image;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod publish;
