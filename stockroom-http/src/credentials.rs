/// Supplies the bearer token for authenticated calls and is told when the
/// backend rejects it.
pub trait CredentialSource: Send + Sync {
    /// Current token, if a session is active
    fn bearer_token(&self) -> Option<String>;

    /// Called on every 401, from whichever request observed it
    fn on_unauthorized(&self);
}
