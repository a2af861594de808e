// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by token refreshes and resource calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + action.
	pub fn new(kind: CallKind, action: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("myfox_client.call", kind = kind.as_str(), action);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, action);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event when `$enabled` holds and tracing is compiled in.
macro_rules! debug_event {
	($enabled:expr, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			if $enabled {
				::tracing::debug!($($arg)+);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = $enabled;
		}
	}};
}

/// Emits a warning event when tracing is compiled in.
macro_rules! warn_event {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::warn!($($arg)+);
		}
		#[cfg(not(feature = "tracing"))]
		{
			$crate::obs::consume_fields!($($arg)+);
		}
	}};
}

/// Emits an error event when tracing is compiled in.
macro_rules! error_event {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::error!($($arg)+);
		}
		#[cfg(not(feature = "tracing"))]
		{
			$crate::obs::consume_fields!($($arg)+);
		}
	}};
}

/// Borrows every field value of an event so builds without tracing see them used.
#[cfg(not(feature = "tracing"))]
macro_rules! consume_fields {
	() => {};
	($field:ident = % $value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$crate::obs::consume_fields!($($($rest)*)?);
	};
	($field:ident = ? $value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$crate::obs::consume_fields!($($($rest)*)?);
	};
	($field:ident = $value:expr $(, $($rest:tt)*)?) => {
		let _ = &$value;
		$crate::obs::consume_fields!($($($rest)*)?);
	};
	($field:ident $(, $($rest:tt)*)?) => {
		let _ = &$field;
		$crate::obs::consume_fields!($($($rest)*)?);
	};
	($message:literal $(, $($rest:tt)*)?) => {};
}

pub(crate) use {debug_event, error_event, warn_event};
#[cfg(not(feature = "tracing"))]
pub(crate) use consume_fields;
