//! HTTP handler functions for the theft viewer API.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use theft_map_analytics::{classify, group_by_period, parse_group_by, parse_sort_period};
use theft_map_server_models::{ApiHealth, PlotQuery, PlotResponse, SearchForm, SettingsForm};
use theft_map_settings::{PLOT_END_DATE, PLOT_START_DATE, SORT_TYPE};
use theft_map_source::fetch_thefts;
use theft_map_theft_models::Borough;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/boundaries`
///
/// Returns the borough boundaries `GeoJSON` document for the map layer.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.boundaries)
}

/// `POST /api/search`
///
/// Validates the form, fetches matching complaints, and returns the
/// classified result set with its legend.
pub async fn search(state: web::Data<AppState>, form: web::Form<SearchForm>) -> HttpResponse {
    if form.borough.is_empty() {
        return bad_request("Please select a borough.");
    }

    let Ok(borough) = form.borough.parse::<Borough>() else {
        return bad_request(&format!("Unknown borough '{}'.", form.borough));
    };

    let (start, end) = match parse_date_range(&form.start_date, &form.end_date) {
        Ok(range) => range,
        Err(message) => return bad_request(&message),
    };
    if start > end {
        return bad_request("Start date must be before end date.");
    }

    let group_by = match parse_group_by(&form.group_by) {
        Ok(mode) => mode,
        Err(e) => return bad_request(&e.to_string()),
    };

    let result_set = match fetch_thefts(state.client.as_ref(), borough, start, end).await {
        Ok(set) => set,
        Err(e) => {
            log::error!("Failed to query car theft data: {e}");
            return server_error("Failed to query car theft data");
        }
    };

    match classify(result_set, group_by) {
        Ok(classified) => HttpResponse::Ok().json(classified),
        Err(e) => {
            log::error!("Failed to classify results: {e}");
            server_error("Failed to classify results")
        }
    }
}

/// `POST /api/settings`
///
/// Validates and persists the three plot settings.
pub async fn update_settings(
    state: web::Data<AppState>,
    form: web::Form<SettingsForm>,
) -> HttpResponse {
    let (start, end) = match parse_date_range(&form.plot_start_date, &form.plot_end_date) {
        Ok(range) => range,
        Err(message) => return bad_request(&message),
    };
    if start > end {
        return bad_request("Plot start date must be before plot end date.");
    }

    if let Err(e) = parse_sort_period(&form.sort_type) {
        return bad_request(&e.to_string());
    }

    let updates = [
        (PLOT_START_DATE, form.plot_start_date.as_str()),
        (PLOT_END_DATE, form.plot_end_date.as_str()),
        (SORT_TYPE, form.sort_type.as_str()),
    ];
    for (name, value) in updates {
        if let Err(e) = state.settings.set(name, value) {
            log::error!("Failed to persist setting {name}: {e}");
            return server_error("Failed to update settings");
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": "Settings updated successfully!"
    }))
}

/// `GET /api/plot`
///
/// Invoked when the user selects a boundary feature on the map. Uses the
/// persisted plot settings to fetch and bucket that borough's thefts for
/// the slide-sheet bar chart.
pub async fn plot(state: web::Data<AppState>, query: web::Query<PlotQuery>) -> HttpResponse {
    let Ok(borough) = query.boro_name.parse::<Borough>() else {
        return bad_request(&format!("Unknown borough '{}'.", query.boro_name));
    };

    let settings = &state.settings;
    let setting = |name: &str| {
        settings.get(name).map_err(|e| {
            log::error!("Failed to read setting {name}: {e}");
        })
    };
    let (Ok(start_setting), Ok(end_setting), Ok(sort_setting)) = (
        setting(PLOT_START_DATE),
        setting(PLOT_END_DATE),
        setting(SORT_TYPE),
    ) else {
        return server_error("Failed to read plot settings");
    };

    let (start, end) = match parse_date_range(&start_setting, &end_setting) {
        Ok(range) => range,
        Err(message) => return bad_request(&message),
    };
    let period = match parse_sort_period(&sort_setting) {
        Ok(period) => period,
        Err(e) => return bad_request(&e.to_string()),
    };

    let result_set = match fetch_thefts(state.client.as_ref(), borough, start, end).await {
        Ok(set) => set,
        Err(e) => {
            log::error!("Failed to query car theft data: {e}");
            return server_error("Failed to query car theft data");
        }
    };

    let (labels, counts) = group_by_period(&result_set, period);
    let title = format!("Car Theft in {borough} from {start_setting} to {end_setting}");
    HttpResponse::Ok().json(PlotResponse::bar(
        title,
        labels,
        counts,
        "Number of Car Thefts",
    ))
}

/// Parses a `MM/DD/YYYY` form date.
///
/// The original app compared the raw strings lexicographically, which is
/// wrong across month and year boundaries; dates are compared as calendar
/// dates here instead.
fn parse_us_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%m/%d/%Y")
        .map_err(|_| format!("Invalid date '{value}': expected MM/DD/YYYY."))
}

fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), String> {
    Ok((parse_us_date(start)?, parse_us_date(end)?))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn server_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": message }))
}
