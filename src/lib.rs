#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Managed Recipe
//!
//! > **A Recipe for metadata-driven management of live objects in Rust.**
//!
//! This crate lets an application expose selected state and behavior of its
//! objects to a management agent. A type declares markers on its fields and
//! methods; the framework turns those markers into a **Directory** of attributes
//! and operations, dispatches reads, writes and invocations by name, and offers
//! typed facades over the same path.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why declarative type tables?
//!
//! Rust has no runtime member enumeration. Instead of reflection, every managed
//! type states its management surface once, as a [`TypeModel`](framework::TypeModel):
//! - **Fields** carry attribute markers but are never read directly.
//! - **Methods** are typed closures over `&T`, wrapped so they can be called with
//!   dynamic [`Value`](framework::Value)s.
//! - **Ancestors** are other models chained with `extends`, so a base model
//!   (e.g. [`monitor_model`](processing_bean::monitor_model)) is written once.
//!
//! This combination provides:
//! - **One build per type**: Directories are cached and shared by every instance.
//! - **Early rejection**: Ambiguous markers, missing accessors and duplicate
//!   operations fail the build, not the first request.
//! - **Type Safety**: Typed clients see `Result<i64, CounterError>`, not `Value`.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: The Power of `T`
//! You'll see `Dispatcher<T: Managed>` everywhere. The dispatch path is written
//! **once** and works for counters, services and monitors alike. Above it, the
//! agent and the proxies only see `dyn ManagedAccess`.
//!
//! ### Mocking: Testing without Pain
//! Typed clients can be tested without a real object behind them. See the
//! [`framework::mock`] module for [`MockAccess`](framework::mock::MockAccess).
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each payload defines its own error type (`CounterError`, `ServiceError`,
//! `ProcessingError`). The framework separates *build* failures
//! ([`BuildError`](framework::BuildError)) from *dispatch* failures
//! ([`DispatchError`](framework::DispatchError)); a failure raised by the managed
//! object is kept as the `source()` of an invocation failure.
//!
//! ### 2. Concurrency Model
//! Managed objects are shared as `Arc<T>` between the application and any number
//! of management callers. Their state uses atomics and locks; the dispatcher holds
//! no lock while calling into them.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging. See the
//! [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Markers, type tables, the resolver, the Directory builder and the dispatcher.
//! - **Key items**: [`Managed`](framework::Managed), [`Directory`](framework::Directory),
//!   [`Dispatcher`](framework::Dispatcher), [`ManagedAccess`](framework::ManagedAccess).
//!
//! ### 2. The Registry ([`lifecycle`])
//! Names objects and routes requests to them by name.
//! - **Key items**: [`ObjectName`](lifecycle::ObjectName),
//!   [`ManagementAgent`](lifecycle::ManagementAgent), [`Registration`](lifecycle::Registration).
//!
//! ### 3. The Interface ([`clients`])
//! Typed facades built on the proxy adapter.
//! - **Key items**: [`ProxyAdapter`](clients::ProxyAdapter), [`CounterClient`](clients::CounterClient),
//!   [`managed_client!`](crate::managed_client).
//!
//! ### 4. The Implementation ([`counter_bean`], [`service_bean`], [`processing_bean`])
//! Concrete managed objects from [`model`] and their `Managed` implementations.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod clients;
pub mod counter_bean;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod processing_bean;
pub mod service_bean;

#[doc(hidden)]
pub use paste;
