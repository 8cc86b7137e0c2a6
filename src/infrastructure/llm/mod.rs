//! Text-generation provider implementations

mod cohere;
mod http_client;

pub use cohere::{CohereProvider, CohereSettings, DEFAULT_COHERE_GENERATE_URL};
pub use http_client::{HttpClient, HttpClientTrait};
