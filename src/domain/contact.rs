/// Read-mostly projection of another identity, used to originate new chats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub display_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: String,
    pub avatar_initials: String,
    pub online: bool,
}
