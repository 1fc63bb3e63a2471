/// One state-changing action, recorded on the `audit` tracing target.
pub struct AuditEntry<'a> {
    pub actor_name: &'a str,
    pub action: &'a str,
    pub resource: &'a str,
    pub detail: Option<serde_json::Value>,
}

pub fn write_audit(entry: &AuditEntry<'_>) {
    tracing::info!(
        target: "audit",
        actor = entry.actor_name,
        action = entry.action,
        resource = entry.resource,
        detail = entry.detail.as_ref().map(tracing::field::display),
        "audit"
    );
}
