//! Azure AI Vision (Image Analysis 4.0) REST client.
mod client;

pub use client::{AzureVisionClient, DEFAULT_API_VERSION, DEFAULT_TIMEOUT};
