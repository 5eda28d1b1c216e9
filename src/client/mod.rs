//! Client application: typed API access, the in-memory state container, and
//! session persistence, combined by [`BlogClient`].

pub mod api;
pub mod error;
pub mod session;
pub mod state;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{BlogInput, BlogView, Credentials, LoginResponse, PublicUser};
use crate::auth::Principal;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::SessionFile;
pub use state::{ClientState, Session};

/// Runs API calls and keeps [`ClientState`] in step with their results.
///
/// - a list fetch replaces the cache; create/update/delete patch it
/// - the last error message is kept for display
/// - any 401 or 403 logs the user out, including a 403 for editing someone
///   else's post
pub struct BlogClient {
    api: ApiClient,
    state: ClientState,
    sessions: Option<SessionFile>,
}

impl BlogClient {
    /// Client with no persisted session
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: ClientState::new(),
            sessions: None,
        }
    }

    /// Client that restores its session from `sessions` and writes every
    /// login/logout back to it
    pub fn with_session_file(mut api: ApiClient, sessions: SessionFile) -> Result<Self, ClientError> {
        let session = sessions.load()?;
        api.set_token(session.as_ref().map(|s| s.token.clone()));

        Ok(Self {
            api,
            state: ClientState::with_session(session),
            sessions: Some(sessions),
        })
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn can_edit(&self, blog: &BlogView) -> bool {
        self.state.can_edit(blog)
    }

    pub async fn register(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let result = self.api.register(&Credentials::new(email, password)).await;
        self.track(result)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let result = self.api.login(&Credentials::new(email, password)).await;
        let response = self.track(result)?;

        let session = Session {
            user: response.user.clone(),
            token: response.token.clone(),
        };
        if let Some(file) = &self.sessions {
            file.save(&session)?;
        }
        self.api.set_token(Some(session.token.clone()));
        self.state.login(session);

        Ok(response)
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.state.logout();
        self.api.set_token(None);
        if let Some(file) = &self.sessions {
            file.clear()?;
        }
        Ok(())
    }

    /// Ask the server who the current token belongs to
    pub async fn whoami(&mut self) -> Result<Principal, ClientError> {
        let result = self.api.whoami().await;
        self.track(result)
    }

    /// Fetch every blog and replace the cache with the result
    pub async fn refresh_blogs(&mut self) -> Result<&[BlogView], ClientError> {
        let result = self.api.list_blogs().await;
        let blogs = self.track(result)?;
        self.state.set_blogs(blogs);
        Ok(self.state.blogs())
    }

    /// Cached copy if present, otherwise ask the server
    pub async fn show(&mut self, id: Uuid) -> Result<BlogView, ClientError> {
        if let Some(blog) = self.state.find_blog(id) {
            return Ok(blog.clone());
        }
        let result = self.api.get_blog(id).await;
        self.track(result)
    }

    pub async fn create(&mut self, title: &str, content: &str) -> Result<BlogView, ClientError> {
        self.require_session()?;
        let input = BlogInput {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        };
        let result = self.api.create_blog(&input).await;
        let blog = self.track(result)?;
        self.state.add_blog(blog.clone());
        Ok(blog)
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<BlogView, ClientError> {
        self.require_session()?;
        let result = self.api.update_blog(id, &BlogInput { title, content }).await;
        let blog = self.track(result)?;
        self.state.update_blog(id, blog.clone());
        Ok(blog)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.require_session()?;
        let result = self.api.delete_blog(id).await;
        self.track(result)?;
        self.state.remove_blog(id);
        Ok(())
    }

    fn require_session(&self) -> Result<(), ClientError> {
        if self.state.is_authenticated() {
            Ok(())
        } else {
            Err(ClientError::NotLoggedIn("Not logged in. Run `blog auth login` first."))
        }
    }

    fn track<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.state.set_error(None);
                Ok(value)
            }
            Err(err) => {
                self.state.set_error(Some(err.to_string()));
                if err.is_auth_failure() && self.state.is_authenticated() {
                    debug!("Discarding session after {:?}", err.status());
                    if let Err(clear_err) = self.logout() {
                        warn!("Failed to clear stored session: {}", clear_err);
                    }
                }
                Err(err)
            }
        }
    }
}
