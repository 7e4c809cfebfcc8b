use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Jeton d'annulation partagé entre le handler Ctrl+C et la boucle d'animation.
///
/// Le jeton n'accepte une annulation que lorsqu'il est armé : hors animation,
/// le handler sait qu'il doit quitter le processus à la place.
///
/// # Example
/// ```
/// use sg_core::cancel::CancelToken;
/// let token = CancelToken::new();
/// assert!(!token.cancel_if_armed());
/// let guard = token.arm();
/// assert!(token.cancel_if_armed());
/// assert!(token.is_cancelled());
/// drop(guard);
/// assert!(!token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    armed: AtomicBool,
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Fresh, disarmed token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the token for the lifetime of the returned guard.
    ///
    /// Any previous cancellation is cleared.
    #[must_use]
    pub fn arm(&self) -> ArmGuard {
        self.inner.cancelled.store(false, Ordering::SeqCst);
        self.inner.armed.store(true, Ordering::SeqCst);
        ArmGuard {
            token: self.clone(),
        }
    }

    /// Request cancellation unconditionally.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Request cancellation if armed. Returns `false` when nobody listens.
    #[must_use]
    pub fn cancel_if_armed(&self) -> bool {
        if self.inner.armed.load(Ordering::SeqCst) {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// `true` once cancellation was requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

/// Désarme le jeton et efface l'annulation au drop.
#[derive(Debug)]
pub struct ArmGuard {
    token: CancelToken,
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        self.token.inner.armed.store(false, Ordering::SeqCst);
        self.token.inner.cancelled.store(false, Ordering::SeqCst);
    }
}
