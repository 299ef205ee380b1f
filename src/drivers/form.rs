//! Headless form driver.
//!
//! Connects to the host, builds the form from the `init` frame, then
//! multiplexes three inputs on one task: host frames, UI commands from stdin,
//! and finished center lookups. Lookups run as spawned tasks and report back
//! over a channel, so a slow geocoder never stalls the loop.

use form::center::Place;
use form::features::FormFeatures;
use form::store::{FormStore, InitPayload};
use form::sync::{Effect, SyncChannel};
use frames::ErrorCode;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{FormInput, parse_form_line};
use crate::config::CellConfig;
use crate::error::CellError;
use crate::services::geocode::NominatimClient;
use crate::transport::HostConnection;

const LOOKUP_QUEUE: usize = 16;

type LookupResult = (u64, Option<Place>);

pub async fn run(config: &CellConfig, cell_id: String) -> Result<(), CellError> {
    let url = config.require_host_url()?;
    let geocoder = NominatimClient::new(config)?;
    let mut conn = HostConnection::connect(url, config.wire, cell_id).await?;

    let init = conn.wait_for("init").await?;
    let mut channel = build_channel(config.features, init.data)?;
    tracing::info!(layers = channel.store().layers().len(), "form session started");
    if let Some(dep) = channel.store().missing_dep() {
        tracing::warn!(dep, "host reports a missing dependency");
    }

    let (lookup_tx, mut lookup_rx) = mpsc::channel::<LookupResult>(LOOKUP_QUEUE);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let effects = tokio::select! {
            frame = conn.recv() => match frame? {
                Some(frame) => channel.handle_frame(&frame),
                None => {
                    tracing::info!("host closed the session");
                    return Ok(());
                }
            },
            line = stdin.next_line(), if stdin_open => match line? {
                Some(line) => handle_line(&mut channel, &line),
                None => {
                    tracing::debug!("stdin closed; serving host frames only");
                    stdin_open = false;
                    Vec::new()
                }
            },
            Some((token, place)) = lookup_rx.recv() => channel.finish_center_lookup(token, place),
        };
        for effect in effects {
            perform(&mut conn, &geocoder, &lookup_tx, effect).await?;
        }
    }
}

pub(crate) fn build_channel(features: FormFeatures, data: Value) -> Result<SyncChannel, CellError> {
    let payload: InitPayload = serde_json::from_value(data).map_err(CellError::InvalidInit)?;
    Ok(SyncChannel::new(FormStore::new(features, payload)))
}

pub(crate) fn handle_line(channel: &mut SyncChannel, line: &str) -> Vec<Effect> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    match parse_form_line(line) {
        Ok(FormInput::Ui(event)) => channel.handle_ui(event),
        Ok(FormInput::Show) => {
            println!("{}", snapshot(channel.store()));
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, line, "unreadable form command");
            Vec::new()
        }
    }
}

/// Store contents plus what a rendered form would show: option lists,
/// selects whose stored value is no longer offered, and the view flags.
pub(crate) fn snapshot(store: &FormStore) -> Value {
    let features = store.features();
    let layers: Vec<Value> = store
        .layers()
        .iter()
        .enumerate()
        .map(|(position, layer)| {
            let unavailable: Vec<&String> =
                layer.fields.keys().filter(|field| !store.field_available(layer, field)).collect();
            json!({
                "layer_id": layer.id,
                "title": FormStore::layer_title(position),
                "subtitle": store.layer_subtitle(layer),
                "fields": layer.fields,
                "type_options": features.type_options(layer.props().source_type()),
                "column_options": store.source_options(layer),
                "unavailable": unavailable,
            })
        })
        .collect();
    json!({
        "root_fields": store.root().as_data(),
        "layers": layers,
        "source_variables": store.source_names(),
        "missing_dep": store.missing_dep(),
        "options": {
            "style": features.style_options(),
            "coordinates_format": features.coordinate_formats(),
            "layer_source_query_strict": features.query_options(),
        },
        "view": {
            "commercial_style": store.root().is_commercial(),
            "no_source_variable": store.no_source_variable(),
            "controls_enabled": store.controls_enabled(),
            "removable_layers": store.has_layers(),
        },
    })
}

async fn perform(
    conn: &mut HostConnection,
    geocoder: &NominatimClient,
    lookups: &mpsc::Sender<LookupResult>,
    effect: Effect,
) -> Result<(), CellError> {
    match effect {
        Effect::Send(message) => conn.send(message.to_frame()).await,
        Effect::LookupCenter(lookup) => {
            let client = geocoder.clone();
            let tx = lookups.clone();
            tokio::spawn(async move {
                let place = match client.lookup_point(&lookup.query).await {
                    Ok(place) => place,
                    Err(e) => {
                        tracing::error!(code = e.error_code(), error = %e, query = %lookup.query, "center lookup failed");
                        None
                    }
                };
                if tx.send((lookup.token, place)).await.is_err() {
                    tracing::debug!(token = lookup.token, "session ended before lookup finished");
                }
            });
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
