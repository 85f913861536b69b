//! Stack safety for deep recursion.
//!
//! Type substitution, descriptor lowering and the value bridge all recurse
//! over structures whose depth is controlled by the program being compiled
//! or by the host objects it receives. Host code calling compiled code which
//! calls host code again nests arbitrarily deep. Wrap those recursive calls
//! in [`ensure_sufficient_stack`].
//!
//! - **Native targets**: grows the stack on demand through `stacker`.
//! - **WASM targets**: plain passthrough.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
