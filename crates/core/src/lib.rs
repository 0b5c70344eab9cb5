pub mod error;
pub mod lexicon;
pub mod models;
pub mod prefs;
pub mod prompts;
pub mod route;

pub use error::{PlanError, RequestError};
pub use lexicon::{render_advisories, NO_RELEVANT_NEWS};
pub use models::*;
pub use prefs::{PrefValue, PreferenceStore};
pub use route::{build_route, route_map_url};
