// Async client for the legacy `WSEndUser` SOAP web service.
//
// Auth: login name + password inside every request envelope

use quick_xml::escape::escape;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::VServerInformation;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default SOAP endpoint.
pub const DEFAULT_SOAP_URL: &str = "https://www.servercontrolpanel.de/WSEndUser";

/// Target namespace of the end-user web service.
pub const SOAP_NAMESPACE: &str = "http://enduser.service.web.vcp.netcup.de/";

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

// ── Envelope shapes ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope<B> {
    #[serde(rename = "Body")]
    body: B,
}

#[derive(Debug, Deserialize)]
struct Fault {
    faultcode: Option<String>,
    faultstring: Option<String>,
}

impl Fault {
    fn into_error(self) -> Error {
        let message = self
            .faultstring
            .or(self.faultcode)
            .unwrap_or_else(|| "unspecified fault".into());
        Error::SoapFault { message }
    }
}

/// A `<soap:Body>` holding either a fault or one operation response.
trait SoapBody: DeserializeOwned {
    type Output;

    fn into_parts(self) -> (Option<Fault>, Option<Self::Output>);
}

#[derive(Deserialize)]
struct GetVServersBody {
    #[serde(rename = "Fault")]
    fault: Option<Fault>,
    #[serde(rename = "getVServersResponse")]
    response: Option<GetVServersResponse>,
}

#[derive(Deserialize)]
struct GetVServersResponse {
    #[serde(rename = "return", default)]
    names: Vec<String>,
}

impl SoapBody for GetVServersBody {
    type Output = Vec<String>;

    fn into_parts(self) -> (Option<Fault>, Option<Self::Output>) {
        (self.fault, self.response.map(|r| r.names))
    }
}

#[derive(Deserialize)]
struct GetVServerInformationBody {
    #[serde(rename = "Fault")]
    fault: Option<Fault>,
    #[serde(rename = "getVServerInformationResponse")]
    response: Option<GetVServerInformationResponse>,
}

#[derive(Deserialize)]
struct GetVServerInformationResponse {
    #[serde(rename = "return")]
    info: Option<VServerInformation>,
}

impl SoapBody for GetVServerInformationBody {
    type Output = VServerInformation;

    fn into_parts(self) -> (Option<Fault>, Option<Self::Output>) {
        (self.fault, self.response.and_then(|r| r.info))
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the legacy SOAP endpoint.
#[derive(Clone)]
pub struct SoapClient {
    http: reqwest::Client,
    endpoint: Url,
    login_name: String,
    password: SecretString,
}

impl SoapClient {
    pub fn new(
        endpoint: &str,
        login_name: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            Url::parse(endpoint)?,
            login_name,
            password,
        ))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Url,
        login_name: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            endpoint,
            login_name: login_name.into(),
            password,
        }
    }

    /// Names of all vservers on the account.
    pub async fn get_vservers(&self) -> Result<Vec<String>, Error> {
        self.call::<GetVServersBody>("getVServers", &[]).await
    }

    /// Full information for one vserver.
    pub async fn get_vserver_information(
        &self,
        vserver_name: &str,
    ) -> Result<VServerInformation, Error> {
        self.call::<GetVServerInformationBody>(
            "getVServerInformation",
            &[("vservername", vserver_name)],
        )
        .await
    }

    fn envelope(&self, operation: &str, params: &[(&str, &str)]) -> String {
        let credentials = [
            ("loginName", self.login_name.as_str()),
            ("password", self.password.expose_secret()),
        ];
        let fields: String = credentials
            .iter()
            .chain(params)
            .map(|(name, value)| format!("<{name}>{}</{name}>", escape(*value)))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soap:Envelope xmlns:soap="{SOAP_ENVELOPE_NS}"><soap:Body><{operation} xmlns="{SOAP_NAMESPACE}">{fields}</{operation}></soap:Body></soap:Envelope>"#
        )
    }

    async fn call<B: SoapBody>(
        &self,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<B::Output, Error> {
        debug!("POST {} ({operation})", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(self.envelope(operation, params))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        // Faults arrive with HTTP 500, so the body is inspected before the status.
        let envelope: Envelope<B> = match quick_xml::de::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::Api {
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(Error::Xml(e.to_string())),
        };

        let (fault, output) = envelope.body.into_parts();
        if let Some(fault) = fault {
            return Err(fault.into_error());
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        output.ok_or_else(|| Error::Xml(format!("missing {operation}Response element")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> SoapClient {
        SoapClient::with_client(
            reqwest::Client::new(),
            Url::parse(DEFAULT_SOAP_URL).unwrap(),
            "12345",
            SecretString::from("p<w>&d".to_string()),
        )
    }

    #[test]
    fn envelope_escapes_credentials() {
        let xml = client().envelope("getVServers", &[]);
        assert!(xml.contains("<loginName>12345</loginName>"));
        assert!(xml.contains("<password>p&lt;w&gt;&amp;d</password>"));
        assert!(xml.contains(r#"<getVServers xmlns="http://enduser.service.web.vcp.netcup.de/">"#));
    }

    #[test]
    fn envelope_appends_operation_params() {
        let xml = client().envelope("getVServerInformation", &[("vservername", "v22")]);
        assert!(xml.contains("</password><vservername>v22</vservername></getVServerInformation>"));
    }
}
