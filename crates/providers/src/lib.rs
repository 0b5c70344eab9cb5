pub mod env;
pub mod error;
pub mod generation;
pub mod geocode;
pub mod locate;
pub mod news;
pub mod places;
pub mod weather;

pub use error::ProviderError;
pub use generation::{GenerationBackend, GenerationProvider, GeminiClient, ScriptedGeneration};
pub use geocode::{FixedGeocoder, GeocodeBackend, GeocodeProvider, GoogleGeocoder, LatLng};
pub use locate::IpLocator;
pub use news::{NewsApiClient, NewsBackend, NewsProvider, StaticNews};
pub use places::{GazetteerExtractor, PlaceExtractor};
pub use weather::{
    ForecastOutcome, OpenWeatherClient, StaticWeather, WeatherBackend, WeatherProvider,
};
