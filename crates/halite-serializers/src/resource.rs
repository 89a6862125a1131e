//! Resource rendering: the pipeline body, wrapped under the root key

use crate::context::Context;
use crate::serializer::{Serializer, Subject};
use halite_core::RenderResult;
use serde_json::{Map, Value};

pub(crate) fn render<T: Subject>(
	serializer: &Serializer<T>,
	resource: &str,
	context: &Context<'_>,
) -> RenderResult<Value> {
	let body = serializer.schema().pipeline().render(serializer, context)?;

	let root = context.include_root();
	match root.root_name(resource) {
		Some(key) => {
			let mut wrapped = Map::new();
			wrapped.insert(key.to_string(), Value::Object(body));
			Ok(Value::Object(wrapped))
		}
		None => Ok(Value::Object(body)),
	}
}
