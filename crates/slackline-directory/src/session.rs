//! Session bootstrap.
//!
//! A [`Session`] turns the selected credential into authenticated clients,
//! lazily and exactly once. The first access verifies the credential with an
//! identity round trip; later accesses reuse the result. A failed round
//! trip is remembered too: the session never retries it.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use slackline_client::SlackClient;

use crate::backend::{DirectoryBackend, EnterpriseBackend, StandardBackend};
use crate::config::HttpSettings;
use crate::credentials::Credential;
use crate::error::{DirectoryError, Result};
use crate::types::{Identity, Protocol};

/// Authenticated client handles for one credential.
pub struct Session {
    credential: Credential,
    http: HttpSettings,
    generic: OnceCell<std::result::Result<(SlackClient, Identity), BootFailure>>,
    enterprise: OnceCell<SlackClient>,
    backend: OnceCell<Arc<dyn DirectoryBackend>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.credential.mode())
            .field("identity", &self.identity_if_ready())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Prepare a session. Nothing touches the network until first use.
    pub fn new(credential: Credential, http: HttpSettings) -> Self {
        Self {
            credential,
            http,
            generic: OnceCell::new(),
            enterprise: OnceCell::new(),
            backend: OnceCell::new(),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Identity, if the session has already booted.
    pub fn identity_if_ready(&self) -> Option<&Identity> {
        match self.generic.get() {
            Some(Ok((_, identity))) => Some(identity),
            _ => None,
        }
    }

    /// Standard-surface client, authenticating on first call.
    pub async fn generic(&self) -> Result<&SlackClient> {
        Ok(&self.boot().await?.0)
    }

    /// The authenticated identity, authenticating on first call.
    pub async fn identity(&self) -> Result<&Identity> {
        Ok(&self.boot().await?.1)
    }

    /// Organization-wide client, bound to the workspace URL from the identity.
    pub async fn enterprise(&self) -> Result<&SlackClient> {
        self.enterprise
            .get_or_try_init(|| async {
                let (generic, identity) = self.boot().await?;
                let client = generic
                    .rebased(&identity.url)
                    .map_err(|e| DirectoryError::ClientSetup(Arc::new(e)))?;
                debug!(api_url = %client.api_url(), "Enterprise client ready");
                Ok(client)
            })
            .await
    }

    /// The enumeration backend matching the identity's protocol.
    pub async fn backend(&self) -> Result<Arc<dyn DirectoryBackend>> {
        let backend = self
            .backend
            .get_or_try_init(|| async {
                let identity = self.identity().await?;
                let generic = self.generic().await?.clone();
                let backend: Arc<dyn DirectoryBackend> = match identity.protocol() {
                    Protocol::Standard => Arc::new(StandardBackend::new(generic)),
                    Protocol::Enterprise => {
                        let enterprise = self.enterprise().await?.clone();
                        Arc::new(EnterpriseBackend::new(generic, enterprise))
                    }
                };
                debug!(protocol = ?backend.protocol(), "Selected enumeration backend");
                Ok::<_, DirectoryError>(backend)
            })
            .await?;
        Ok(Arc::clone(backend))
    }

    async fn boot(&self) -> Result<&(SlackClient, Identity)> {
        let outcome = self
            .generic
            .get_or_init(|| async {
                let client = self
                    .build_client()
                    .map_err(|e| BootFailure::Setup(Arc::new(e)))?;
                let identity: Identity = client
                    .auth()
                    .test()
                    .await
                    .map_err(|e| BootFailure::Auth(Arc::new(e)))?
                    .into();
                info!(
                    mode = %self.credential.mode(),
                    team = %identity.team,
                    user = %identity.user,
                    enterprise = identity.enterprise_id.as_deref().unwrap_or("-"),
                    "Authenticated"
                );
                Ok::<_, BootFailure>((client, identity))
            })
            .await;
        outcome.as_ref().map_err(|failure| failure.clone().into())
    }

    fn build_client(&self) -> slackline_client::Result<SlackClient> {
        let mut builder = SlackClient::builder()
            .token(self.credential.token())
            .insecure(self.http.insecure);
        if let Some(cookie) = self.credential.cookie() {
            builder = builder.cookie(cookie);
        }
        if let Some(url) = &self.http.api_url {
            builder = builder.api_url(url);
        }
        if let Some(proxy) = &self.http.proxy {
            builder = builder.proxy(proxy);
        }
        if let Some(ca) = &self.http.ca_cert {
            builder = builder.ca_cert(ca);
        }
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(timeout) = self.http.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// Why the session could not boot, kept for every later caller.
#[derive(Debug, Clone)]
enum BootFailure {
    Setup(Arc<slackline_client::Error>),
    Auth(Arc<slackline_client::Error>),
}

impl From<BootFailure> for DirectoryError {
    fn from(failure: BootFailure) -> Self {
        match failure {
            BootFailure::Setup(e) => DirectoryError::ClientSetup(e),
            BootFailure::Auth(e) => DirectoryError::Auth(e),
        }
    }
}
