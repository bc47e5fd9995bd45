use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeError, ReverseGeocoder};
use crate::common::Coordinate;

/// HTTP client for a Nominatim-compatible `/reverse` endpoint
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

// Nominatim jsonv2 响应
#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

/// Structured place as returned by a reverse geocoder.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlaceAddress {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl PlaceAddress {
    /// Joins the non-empty parts with ", "; `None` when nothing is left.
    pub fn formatted(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.name,
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl From<ReverseResponse> for PlaceAddress {
    fn from(resp: ReverseResponse) -> Self {
        let address = resp.address;
        PlaceAddress {
            name: resp.name,
            street: address.road,
            city: address.city.or(address.town).or(address.village),
            region: address.state,
            postal_code: address.postcode,
            country: address.country,
        }
    }
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: ReverseResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(GeocodeError::Other(err));
        }

        let address = PlaceAddress::from(body).formatted();
        tracing::debug!("Reverse geocoded {:?} to {:?}", coordinate, address);
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    use super::*;

    type Params = HashMap<String, String>;

    // 在本地随机端口启动一个假的 /reverse 服务
    async fn serve_reverse<F>(respond: F) -> NominatimGeocoder
    where
        F: Fn(Params) -> Response + Clone + Send + Sync + 'static,
    {
        let app = Router::new().route(
            "/reverse",
            get(move |Query(params): Query<Params>| {
                let respond = respond.clone();
                async move { respond(params) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        NominatimGeocoder::new(&format!("http://{}", addr), "test", Duration::from_secs(5)).unwrap()
    }

    const HERE: Coordinate = Coordinate::new(29.5384, 76.9724);

    #[tokio::test]
    async fn lookup_formats_the_reverse_answer() {
        let geocoder = serve_reverse(|params| {
            assert_eq!(params["format"], "jsonv2");
            assert_eq!(params["lat"], "29.5384");
            assert_eq!(params["lon"], "76.9724");
            Json(json!({
                "name": "Gate",
                "address": { "road": "NH44", "village": "Uchana", "country": "India" }
            }))
            .into_response()
        })
        .await;

        assert_eq!(
            geocoder.lookup(HERE).await.unwrap().as_deref(),
            Some("Gate, NH44, Uchana, India")
        );
    }

    #[tokio::test]
    async fn lookup_with_empty_place_is_none() {
        let geocoder = serve_reverse(|_| Json(json!({ "address": {} })).into_response()).await;
        assert_eq!(geocoder.lookup(HERE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lookup_surfaces_nominatim_error_body() {
        let geocoder =
            serve_reverse(|_| Json(json!({ "error": "Unable to geocode" })).into_response()).await;

        let err = geocoder.lookup(HERE).await.unwrap_err();
        assert!(matches!(&err, GeocodeError::Other(msg) if msg == "Unable to geocode"));
        assert_eq!(err.to_string(), "reverse geocoder error: Unable to geocode");
    }

    #[tokio::test]
    async fn lookup_rejects_non_success_status() {
        let geocoder =
            serve_reverse(|_| (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()).await;

        let err = geocoder.lookup(HERE).await.unwrap_err();
        assert!(matches!(
            err,
            GeocodeError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    fn parse(json: &str) -> PlaceAddress {
        serde_json::from_str::<ReverseResponse>(json).unwrap().into()
    }

    #[test]
    fn formats_parts_in_order_and_skips_blanks() {
        let place = parse(
            r#"{
                "name": "Kurukshetra University",
                "address": {
                    "road": "",
                    "town": "Thanesar",
                    "state": "Haryana",
                    "postcode": "136119",
                    "country": "India"
                }
            }"#,
        );
        assert_eq!(place.city.as_deref(), Some("Thanesar"));
        assert_eq!(
            place.formatted().as_deref(),
            Some("Kurukshetra University, Thanesar, Haryana, 136119, India")
        );
    }

    #[test]
    fn city_wins_over_town_and_village() {
        let place = parse(r#"{"address": {"city": "Karnal", "village": "Uchana"}}"#);
        assert_eq!(place.formatted().as_deref(), Some("Karnal"));
    }

    #[test]
    fn empty_place_has_no_address() {
        assert_eq!(parse(r#"{"name": " "}"#).formatted(), None);
        assert_eq!(PlaceAddress::default().formatted(), None);
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let geocoder =
            NominatimGeocoder::new("https://nominatim.example.org/", "test", Duration::from_secs(1))
                .unwrap();
        assert_eq!(geocoder.base_url(), "https://nominatim.example.org");
    }
}
