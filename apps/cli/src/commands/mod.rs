//! # Commands
//!
//! One module per screen. Every command borrows the [`AppState`] and, except
//! for `register` and `login`, the caller's [`Session`]:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn op(state: &AppState, session: &Session, ...)                  │
//! │        -> Result<T, ApiError>                                           │
//! │                                                                         │
//! │   1. role check (session.require_admin) where the screen demands it     │
//! │   2. form.validate()          ← nothing touches the database on error   │
//! │   3. state.db().<repo>().op() ← one transaction where stock moves       │
//! │   4. T (entity or DTO) back to the caller for rendering                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppState`]: crate::state::AppState
//! [`Session`]: stockroom_core::Session

pub mod auth;
pub mod category;
pub mod damage;
pub mod dashboard;
pub mod debt;
pub mod department;
pub mod expense;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod supplier;
pub mod user;
pub mod warehouse;
