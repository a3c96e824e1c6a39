use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use std::collections::HashMap;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::properties::{ListingStatus, NewProperty};

/// POST /admin/upload - Create a listing from a multipart form
///
/// Expects an `image` file part plus the property fields as text parts:
/// title, description, rate, sqft, beds, baths, rating, booking.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut text = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Malformed upload request: {err}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| ApiError::bad_request(format!("Malformed upload request: {err}")))?;
            image = Some((file_name, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| ApiError::bad_request(format!("Malformed upload request: {err}")))?;
            text.insert(name, value);
        }
    }

    let Some((file_name, bytes)) = image else {
        return Err(ApiError::bad_request("No file uploaded"));
    };

    let fields = parse_fields(&text)
        .map_err(|errors| ApiError::validation_error("Invalid property fields", Some(errors)))?;

    let property = state
        .listings
        .create_listing(&bytes, &file_name, fields)
        .await?;
    info!(id = %property.id, title = %property.title, "Property created");

    Ok(Redirect::to("/").into_response())
}

/// Assemble a NewProperty from the form's text parts, collecting every field
/// problem instead of stopping at the first.
fn parse_fields(text: &HashMap<String, String>) -> Result<NewProperty, HashMap<String, String>> {
    let mut errors = HashMap::new();

    let title = require_text(text, "title", &mut errors);
    let description = require_text(text, "description", &mut errors);
    let rate = parse_number::<f64>(text, "rate", &mut errors);
    let sqft = parse_positive(text, "sqft", &mut errors);
    let beds = parse_positive(text, "beds", &mut errors);
    let baths = parse_positive(text, "baths", &mut errors);
    let rating = parse_number::<f64>(text, "rating", &mut errors);

    let booking = match text.get("booking") {
        Some(value) => match ListingStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                errors.insert(
                    "booking".to_string(),
                    "Must be 'available' or 'soldout'".to_string(),
                );
                None
            }
        },
        None => {
            errors.insert("booking".to_string(), "This field is required".to_string());
            None
        }
    };

    match (title, description, rate, sqft, beds, baths, rating, booking) {
        (
            Some(title),
            Some(description),
            Some(rate),
            Some(sqft),
            Some(beds),
            Some(baths),
            Some(rating),
            Some(booking),
        ) if errors.is_empty() => Ok(NewProperty {
            title,
            description,
            rate,
            image_path: None,
            status: ListingStatus::Available,
            sqft,
            beds,
            baths,
            rating,
            booking,
        }),
        _ => Err(errors),
    }
}

fn require_text(
    text: &HashMap<String, String>,
    field: &str,
    errors: &mut HashMap<String, String>,
) -> Option<String> {
    match text.get(field) {
        Some(value) if !value.trim().is_empty() => Some(value.clone()),
        _ => {
            errors.insert(field.to_string(), "This field is required".to_string());
            None
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    text: &HashMap<String, String>,
    field: &str,
    errors: &mut HashMap<String, String>,
) -> Option<T> {
    match text.get(field).map(|value| value.trim().parse::<T>()) {
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            errors.insert(field.to_string(), "Must be a number".to_string());
            None
        }
        None => {
            errors.insert(field.to_string(), "This field is required".to_string());
            None
        }
    }
}

fn parse_positive(
    text: &HashMap<String, String>,
    field: &str,
    errors: &mut HashMap<String, String>,
) -> Option<i64> {
    let value = parse_number::<i64>(text, field, errors)?;
    if value > 0 {
        Some(value)
    } else {
        errors.insert(field.to_string(), "Must be a positive number".to_string());
        None
    }
}
