pub struct Icons;

impl Icons {
    pub const PIN: &str = "📍";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const MAP: &str = "🗺️";
    pub const DATABASE: &str = "🗄️";
    pub const NEW: &str = "✨";
    pub const MOD: &str = "📝";
    pub const DEL: &str = "🗑️";
    pub const RIGHT: &str = "➡️";
    pub const EMPTY: &str = "∅";
}
