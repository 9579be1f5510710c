//! # Promptline
//!
//! A Rust library for building sequential, interactive command-line prompts:
//! show a message, read a line (or a masked password), validate it, convert
//! it into a typed [`Answer`] and, optionally, chain several prompts into a
//! [`PromptSequence`] whose answers are collected by key.
//!
//! ## Features
//!
//! (All feature versions)
//! - **Prompt engine** - Read / validate / default / serialize loop that retries until valid
//! - **Validation** - Closure validators, AND-chains, regex patterns and declarative [`Rule`](validation::Rule)s
//! - **Typed answers** - Built-in serializers for text, numbers, booleans and IP addresses
//! - **Masked input** - Password entry without echo on a terminal
//! - **Prompt sequences** - Ordered questionnaires collected into [`Responses`]
//! - **Mockable input** - [`LineSource`] trait with scripted and buffered implementations
//!
//! ("tokio-dep" feature, enabled by default)
//! - **Cancellation** - Race any prompt or sequence against a deadline or a
//!   [`CancellationToken`] via [`Cancellable`]
//!
//! ("serde" feature)
//! - **Serialization** - `Serialize` for [`Answer`] and [`Responses`]
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! promptline = "0.1"
//! promptline = { version = "0.1", default-features = false }
//! promptline = { version = "0.1", features = ["serde"] }
//! ```
//!
//! ## Usage Examples
//!
//! ### Single prompt with a default
//!
//! ```rust,no_run
//! use promptline::Prompt;
//!
//! let name = Prompt::new("Enter Name").default_text("Bobby").execute()?;
//! println!("Hello {}!", name.unwrap());
//! # Ok::<(), promptline::PromptError>(())
//! ```
//!
//! ### Validated, typed input
//!
//! ```rust,no_run
//! use promptline::{Prompt, serialization, validation::{self, Rule}};
//!
//! let age = Prompt::new("Age")
//!     .validator(validation::rules(vec![Rule::IsBetween(0, 150)]))
//!     .serializer(serialization::unsigned())
//!     .invalid_message("Age should be between 0 - 150")
//!     .execute()?;
//! # Ok::<(), promptline::PromptError>(())
//! ```
//!
//! ### Questionnaire
//!
//! ```rust,no_run
//! use promptline::{Prompt, PromptSequence, serialization, validation};
//!
//! let responses = PromptSequence::new([
//!     Prompt::new("Name").key("name"),
//!     Prompt::new("Ip")
//!         .key("ip")
//!         .default_text("192.168.1.1")
//!         .validator(validation::ip_address())
//!         .serializer(serialization::ip()),
//!     Prompt::new("Password").key("password").masked(true),
//! ])
//! .execute()?;
//!
//! for (key, answer) in responses.iter() {
//!     println!("{key}: {answer:?}");
//! }
//! # Ok::<(), promptline::PromptError>(())
//! ```
//!
//! ### Testing prompts
//!
//! ```rust
//! use std::io::Cursor;
//! use promptline::{Answer, Prompt, SharedBuffer};
//!
//! let output = SharedBuffer::new();
//! let prompt = Prompt::new("Enter Name")
//!     .with_reader(Cursor::new("  Bobby  \n"))
//!     .with_writer(output.clone());
//!
//! assert_eq!(prompt.execute().unwrap(), Some(Answer::from("Bobby")));
//! assert_eq!(output.contents(), "Enter Name: ");
//! ```
//!
//! ## Architecture
//!
//! - **`prompt`** - The single-prompt execution loop
//! - **`sequence`** - Ordered execution of several prompts
//! - **`cancel`** - Background execution raced against cancellation
//! - **`validation`** / **`serialization`** - Pluggable input checks and conversions
//! - **`source`** - Line sources and output capture
//!
//! ## Error Handling
//!
//! Validation and serialization failures are never errors: the prompt
//! prints its invalid-input message and asks again. Only stream failures,
//! a sequence member without a key, and cancellation reach the caller:
//!
//! ```rust,no_run
//! use promptline::{Prompt, PromptError};
//!
//! match Prompt::new("Name").execute() {
//!     Ok(answer) => println!("{answer:?}"),
//!     Err(PromptError::InputExhausted) => eprintln!("stdin closed"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and never
//! installs a subscriber. Raw input of masked prompts is never logged.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod answer;
mod error;
pub mod prompt;
pub mod sequence;
pub mod serialization;
pub mod source;
pub mod validation;

pub use answer::Answer;
pub use error::{PromptError, Result, SerializeError};
pub use prompt::Prompt;
pub use sequence::{PromptSequence, Responses};
pub use source::{BufferedLineSource, LineSource, ScriptedLineSource, SharedBuffer};

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio-dep")] {
        pub mod cancel;
        pub use cancel::{Cancellable, cancel_after};
        pub use tokio_util::sync::CancellationToken;
    }
}
