//! GeoClue2 location provider over the system D-Bus.

use crate::domain::model::{Coordinate, FixStatus, Permission, Position};
use crate::domain::ports::LocationProvider;
use crate::utils::error::{GeoError, Result};
use async_trait::async_trait;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};
use zbus::Connection;

const SERVICE: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
const DESKTOP_ID: &str = "geofix";
// GCLUE_ACCURACY_LEVEL_EXACT
const ACCURACY_EXACT: u32 = 8;
// GeoClue reports "no location yet" as the root path.
const NO_LOCATION: &str = "/";

struct Session {
    connection: Connection,
    client: OwnedObjectPath,
}

pub struct GeoClueProvider {
    session: Option<Session>,
    permission: Permission,
    disabled: bool,
}

impl GeoClueProvider {
    pub fn new() -> Self {
        Self {
            session: None,
            permission: Permission::Unspecified,
            disabled: false,
        }
    }

    async fn location_path(&self) -> zbus::Result<Option<OwnedObjectPath>> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let value = get_property(&session.connection, session.client.as_str(), CLIENT_IFACE, "Location").await?;
        let path = OwnedObjectPath::try_from(value)?;
        if path.as_str() == NO_LOCATION {
            Ok(None)
        } else {
            Ok(Some(path))
        }
    }
}

impl Default for GeoClueProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationProvider for GeoClueProvider {
    async fn start(&mut self) -> Result<()> {
        let connection = Connection::system()
            .await
            .map_err(|e| GeoError::provider_unavailable(format!("D-Bus connection failed: {e}")))?;

        let reply = connection
            .call_method(Some(SERVICE), MANAGER_PATH, Some(MANAGER_IFACE), "GetClient", &())
            .await;
        let (client,): (OwnedObjectPath,) = match reply {
            Ok(message) => message
                .body()
                .deserialize()
                .map_err(|e| GeoError::provider_unavailable(format!("Failed to parse client path: {e}")))?,
            Err(e) if is_access_denied(&e) => {
                tracing::debug!("GeoClue refused a client: {}", e);
                self.disabled = true;
                return Ok(());
            }
            Err(e) => {
                return Err(GeoError::provider_unavailable(format!("GeoClue2 not available: {e}")));
            }
        };

        let session = self.session.insert(Session { connection, client });

        set_property(session, "DesktopId", Value::from(DESKTOP_ID))
            .await
            .map_err(|e| GeoError::provider_unavailable(format!("Failed to set desktop ID: {e}")))?;
        if let Err(e) = set_property(session, "RequestedAccuracyLevel", Value::from(ACCURACY_EXACT)).await {
            tracing::debug!("Could not request exact accuracy: {}", e);
        }

        let started = session
            .connection
            .call_method(Some(SERVICE), session.client.as_str(), Some(CLIENT_IFACE), "Start", &())
            .await;
        match started {
            Ok(_) => {
                self.permission = Permission::Allowed;
                Ok(())
            }
            Err(e) if is_access_denied(&e) => {
                self.permission = Permission::Denied;
                Ok(())
            }
            Err(e) => Err(GeoError::provider_unavailable(format!("Failed to start GeoClue client: {e}"))),
        }
    }

    async fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Err(e) = session
            .connection
            .call_method(Some(SERVICE), session.client.as_str(), Some(CLIENT_IFACE), "Stop", &())
            .await
        {
            tracing::debug!("GeoClue client stop failed: {}", e);
        }
    }

    async fn status(&mut self) -> FixStatus {
        if self.disabled {
            return FixStatus::Disabled;
        }
        if self.session.is_none() {
            return FixStatus::NotInitialized;
        }
        match self.location_path().await {
            Ok(Some(_)) => FixStatus::Ready,
            Ok(None) => FixStatus::NoData,
            Err(e) => {
                tracing::debug!("GeoClue location query failed: {}", e);
                FixStatus::Unknown
            }
        }
    }

    async fn permission(&mut self) -> Permission {
        self.permission
    }

    async fn position(&mut self) -> Position {
        let location = match self.location_path().await {
            Ok(Some(location)) => location,
            _ => return Position::Unknown,
        };
        let Some(session) = &self.session else {
            return Position::Unknown;
        };
        match read_coordinate(session, &location).await {
            Ok(coordinate) if coordinate.is_valid() => Position::Known(coordinate),
            Ok(_) => Position::Unknown,
            Err(e) => {
                tracing::debug!("Failed to read GeoClue coordinates: {}", e);
                Position::Unknown
            }
        }
    }
}

async fn read_coordinate(session: &Session, location: &OwnedObjectPath) -> zbus::Result<Coordinate> {
    let latitude = get_property(&session.connection, location.as_str(), LOCATION_IFACE, "Latitude").await?;
    let longitude = get_property(&session.connection, location.as_str(), LOCATION_IFACE, "Longitude").await?;
    Ok(Coordinate::new(f64::try_from(latitude)?, f64::try_from(longitude)?))
}

fn is_access_denied(err: &zbus::Error) -> bool {
    match err {
        zbus::Error::MethodError(name, _, _) => name.as_str().ends_with(".AccessDenied"),
        _ => false,
    }
}

async fn get_property(connection: &Connection, path: &str, interface: &str, name: &str) -> zbus::Result<OwnedValue> {
    let reply = connection
        .call_method(Some(SERVICE), path, Some(PROPERTIES_IFACE), "Get", &(interface, name))
        .await?;
    let value: OwnedValue = reply.body().deserialize()?;
    Ok(value)
}

async fn set_property(session: &Session, name: &str, value: Value<'_>) -> zbus::Result<()> {
    session
        .connection
        .call_method(
            Some(SERVICE),
            session.client.as_str(),
            Some(PROPERTIES_IFACE),
            "Set",
            &(CLIENT_IFACE, name, value),
        )
        .await?;
    Ok(())
}
