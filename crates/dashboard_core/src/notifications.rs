#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub visible: bool,
}

/// Insertion-ordered transient messages.
///
/// Ids come from a counter owned by this queue; they are never reused, and
/// hide/remove look toasts up by id so timers may fire in any order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(Toast {
            id,
            kind,
            title: title.into(),
            message: message.unwrap_or_default(),
            visible: true,
        });
        id
    }

    /// Starts the exit transition. False if the toast is gone or already hidden.
    pub fn hide(&mut self, id: ToastId) -> bool {
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) if toast.visible => {
                toast.visible = false;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|toast| toast.id == id)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}
