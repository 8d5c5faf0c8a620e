//! Authentication protocol
//!
//! Password credentials are exchanged for a session ticket plus CSRF token.
//! Static API tokens are checked for shape and used as-is, with no network
//! call. Either way the previous session is dropped first and the new one is
//! stored only on success.

use std::sync::Arc;

use clustergate_core::GatewayEvent;
use clustergate_domain::constants::TICKET_PATH;
use clustergate_domain::{
    ApiToken, AuthScheme, AuthSession, Credential, ErrorKind, GatewayError, GatewayState,
    RequestBody, Result, TicketData,
};
use tracing::instrument;
use url::form_urlencoded;

use super::client::ClusterGateway;
use super::pipeline::Verb;

impl ClusterGateway {
    /// Establish a session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Authentication`] for a malformed token, a rejected
    ///   or failed credential exchange, or a reply without ticket data
    /// - [`GatewayError::Network`] if the ticket endpoint cannot be reached
    /// - [`GatewayError::Configuration`] if the gateway has been disposed
    #[instrument(skip(self), fields(user = %self.config.user_id()))]
    pub async fn authenticate(&self) -> Result<()> {
        let scheme = match self.config.credential() {
            Credential::Password(_) => AuthScheme::Ticket,
            Credential::Token(_) => AuthScheme::StaticToken,
        };

        self.begin_authentication()?;
        self.diagnostics.record(&GatewayEvent::AuthenticationStarted { scheme });

        let outcome = match self.config.credential() {
            Credential::Token(raw) => {
                ApiToken::parse(raw.as_str()).map(|token| AuthSession::StaticToken { token })
            }
            Credential::Password(password) => self.request_ticket(password).await,
        };

        match self.finish_authentication(outcome) {
            Ok(()) => {
                self.diagnostics.record(&GatewayEvent::Authenticated { scheme });
                Ok(())
            }
            Err(err) => {
                self.diagnostics
                    .record(&GatewayEvent::AuthenticationFailed { scheme, kind: err.kind() });
                Err(err)
            }
        }
    }

    fn begin_authentication(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.write();
        if lifecycle.state == GatewayState::Disposed {
            return Err(GatewayError::configuration("gateway has been disposed"));
        }
        lifecycle.state = GatewayState::Authenticating;
        lifecycle.session = None;
        Ok(())
    }

    fn finish_authentication(&self, outcome: Result<AuthSession>) -> Result<()> {
        let mut lifecycle = self.lifecycle.write();
        if lifecycle.state == GatewayState::Disposed {
            return Err(GatewayError::configuration("gateway was disposed while authenticating"));
        }

        match outcome {
            Ok(session) => {
                lifecycle.state = GatewayState::Authenticated;
                lifecycle.session = Some(Arc::new(session));
                Ok(())
            }
            Err(err) => {
                lifecycle.state = GatewayState::Unauthenticated;
                lifecycle.session = None;
                Err(err)
            }
        }
    }

    async fn request_ticket(&self, password: &str) -> Result<AuthSession> {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.config.user_id())
            .append_pair("password", password)
            .finish();

        let data: Option<TicketData> = self
            .execute(Verb::Create, TICKET_PATH, Some(RequestBody::form(form)))
            .await
            .map_err(ticket_exchange_error)?;

        data.map(AuthSession::from)
            .ok_or_else(|| GatewayError::authentication("ticket endpoint returned no ticket data"))
    }
}

/// Transport failures and 401s pass through; anything else that went wrong
/// during the exchange is reported as an authentication failure.
fn ticket_exchange_error(err: GatewayError) -> GatewayError {
    match err.kind() {
        ErrorKind::Network | ErrorKind::Authentication | ErrorKind::Configuration => err,
        ErrorKind::Authorization | ErrorKind::Api | ErrorKind::Serialization => {
            GatewayError::authentication_caused_by("ticket exchange failed", err)
        }
    }
}
