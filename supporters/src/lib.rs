//! Community supporters aggregation
//!
//! # Overview
//!
//! Gathers the people and organizations supporting a community from two structurally different services:
//! a GraphQL funding platform (contributors, backers, sponsors and collective stats) and a REST code hosting platform
//! (organization members and repository contributors).
//! Both are normalized into one `DisplayMember` model.
//!
//! A request names a collective, a mode (`contributors`, `backers`, `sponsors` or `all`), a `limit` and optionally a
//! GitHub organization or repository. `contributors` with a GitHub target is served by the code hosting platform,
//! everything else by the funding platform, whose records are then classified by mode.
//! Results are cached under a key built from every request parameter and expire after the request's TTL.

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "aggregator")]
pub mod aggregator;
#[cfg(feature = "aggregator")]
pub mod cache;
#[cfg(feature = "aggregator")]
pub mod classifier;
#[cfg(feature = "aggregator")]
pub mod request;
#[cfg(feature = "aggregator")]
pub mod router;
#[cfg(feature = "aggregator")]
pub mod storage;
#[cfg(feature = "aggregator")]
pub mod view;

#[cfg(feature = "aggregator")]
pub use aggregator::AggregationService;
#[cfg(feature = "aggregator")]
pub use request::{GithubTarget, RequestDescriptor};
#[cfg(feature = "aggregator")]
pub use view::{SupportersView, Ticket, ViewState};
