//! Models shared by the unit tests of this crate

use crate::fields::MetaConfig;
use crate::serializer::{Serializer, SerializerKind};
use serde::{Deserialize, Serialize};
use storefront_db::{Attribute, Connection, ConnectionExt, Database, DatabaseResult, Model};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maker {
	pub id: Option<i64>,
	pub name: String,
}

impl Model for Maker {
	fn table_name() -> &'static str {
		"maker"
	}
	fn columns() -> &'static [&'static str] {
		&["id", "name"]
	}
	fn id(&self) -> Option<i64> {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gadget {
	pub id: Option<i64>,
	pub name: String,
	pub price: f64,
	pub secret: Option<String>,
	pub maker_id: Option<i64>,
	#[serde(default)]
	pub _revision: i64,
}

impl Model for Gadget {
	fn table_name() -> &'static str {
		"gadget"
	}
	fn columns() -> &'static [&'static str] {
		&["id", "name", "price", "secret", "maker_id", "_revision"]
	}
	fn relations() -> &'static [&'static str] {
		&["maker", "parts"]
	}
	fn unique_columns() -> &'static [&'static str] {
		&["name"]
	}
	fn id(&self) -> Option<i64> {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}
	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		match name {
			"maker" => {
				let maker = match self.maker_id {
					Some(id) => conn.get::<Maker>(id)?,
					None => None,
				};
				Ok(Some(Attribute::one(maker)))
			}
			"parts" => {
				let parts = conn.filter::<Part, _>(|p| Some(p.gadget_id) == self.id)?;
				Ok(Some(Attribute::many(parts)))
			}
			_ => Ok(None),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
	pub id: Option<i64>,
	pub gadget_id: i64,
	pub label: String,
}

impl Model for Part {
	fn table_name() -> &'static str {
		"part"
	}
	fn columns() -> &'static [&'static str] {
		&["id", "gadget_id", "label"]
	}
	fn id(&self) -> Option<i64> {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}
}

pub struct PartSerializer;

impl Serializer for PartSerializer {
	type Model = Part;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id", "label"])
	}
}

/// One maker, two gadgets (only the first one made by it), two parts on the first gadget
pub fn workshop() -> Database {
	let db = Database::new()
		.with_model::<Maker>()
		.with_model::<Gadget>()
		.with_model::<Part>();

	let mut acme = Maker {
		id: None,
		name: "Acme".to_string(),
	};
	db.insert(&mut acme).unwrap();

	for (name, price, maker_id) in [("pad", 59.0, Some(1)), ("orphan", 5.0, None)] {
		let mut gadget = Gadget {
			id: None,
			name: name.to_string(),
			price,
			secret: None,
			maker_id,
			_revision: 0,
		};
		db.insert(&mut gadget).unwrap();
	}

	for label in ["stick", "trigger"] {
		let mut part = Part {
			id: None,
			gadget_id: 1,
			label: label.to_string(),
		};
		db.insert(&mut part).unwrap();
	}
	db
}
