//! Audit event payloads

/// What happened, before the actor and timestamp are attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditEvent {
    pub action: String,
    pub entity: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn entity_id(mut self, id: i32) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Coarse entry for a mutating request, derived from the method and path alone.
    ///
    /// `POST /admin/products/3` becomes `CREATE admin/products` with details
    /// `admin CREATE products`. Paths without a role prefix are attributed to `user`.
    /// The id segment is ignored, so `PUT /basket/12` is recorded as `user/basket`.
    /// Returns `None` for non-mutating methods.
    pub fn from_request(method: &str, path: &str) -> Option<Self> {
        let action = match method {
            "POST" => "CREATE",
            "PUT" => "UPDATE",
            "DELETE" => "DELETE",
            _ => return None,
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (role, rest) = match segments.first() {
            Some(&"admin") => ("admin", &segments[1..]),
            Some(&"manager") => ("manager", &segments[1..]),
            _ => ("user", &segments[..]),
        };
        let entity = rest
            .first()
            .or(segments.first())
            .copied()
            .unwrap_or_default();

        Some(
            AuditEvent::new(action)
                .entity(format!("{}/{}", role, entity))
                .details(format!("{} {} {}", role, action, entity)),
        )
    }
}
