//! Patient API surface
//!
//! ```text
//! ┌─────────────────┐
//! │   PortalApi     │  façade: login/logout + typed fetches
//! └────────┬────────┘
//!          │ Arc<dyn PatientDataSource>   (chosen once at construction)
//!          ├──► LiveDataSource ──► RequestExecutor (HTTP, portal-infra)
//!          └──► DemoDataSource ──► DemoFixtures / DemoExecutor
//! ```

pub mod demo;
pub mod live;
pub mod ports;
pub mod service;
