//! Bidirectional field mapping tables
//!
//! A resource kind describes how its configuration map relates to the API's
//! typed structs with one [`FieldMapping`] per field: the schema declaration,
//! how a configuration value is written into the request struct, and how the
//! response struct is read back into the configuration.
//!
//! Zero-value rule: a field missing from the configuration is written as the
//! zero value of its declared type, so request structs that skip zero values
//! on serialization never send it.
//!
//! ```rust,ignore
//! let fields: &[FieldMapping<Request, Response>] = &[FieldMapping::new(
//!     FieldSchema::required("name", FieldType::String, "The name."),
//!     |req, v| { req.name = v.expect_string()?; Ok(()) },
//!     |resp| resp.name.clone().into(),
//! )];
//! let request: Request = build_request(fields, &data)?;
//! ```

use crate::data::{ResourceData, Value};
use crate::error::{Error, Result};
use crate::schema::{FieldSchema, Schema};

/// Writes a configuration value into a request struct
pub type WriteFn<Req> = fn(&mut Req, &Value) -> std::result::Result<(), String>;

/// Reads a configuration value out of a response struct
pub type ReadFn<Resp> = fn(&Resp) -> Value;

/// One row of a mapping table
pub struct FieldMapping<Req, Resp> {
    pub schema: FieldSchema,
    /// `None` for fields that are never sent (read-only or path parameters)
    pub write: Option<WriteFn<Req>>,
    /// `None` for fields the service never echoes back (creation-only flags)
    pub read: Option<ReadFn<Resp>>,
}

impl<Req, Resp> FieldMapping<Req, Resp> {
    /// A field that is both sent and read back
    pub const fn new(schema: FieldSchema, write: WriteFn<Req>, read: ReadFn<Resp>) -> Self {
        Self {
            schema,
            write: Some(write),
            read: Some(read),
        }
    }

    /// A field that is only sent
    pub const fn write_only(schema: FieldSchema, write: WriteFn<Req>) -> Self {
        Self {
            schema,
            write: Some(write),
            read: None,
        }
    }

    /// A field that is only read back
    pub const fn read_only(schema: FieldSchema, read: ReadFn<Resp>) -> Self {
        Self {
            schema,
            write: None,
            read: Some(read),
        }
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }
}

/// Derive the schema declared by a mapping table
pub fn schema_of<Req, Resp>(version: u32, fields: &[FieldMapping<Req, Resp>]) -> Schema {
    Schema::new(version, fields.iter().map(|f| f.schema.clone()).collect())
}

/// Build a request struct from the configuration's current values
pub fn build_request<Req: Default, Resp>(
    fields: &[FieldMapping<Req, Resp>],
    data: &ResourceData,
) -> Result<Req> {
    let mut request = Req::default();

    for field in fields {
        let Some(write) = field.write else { continue };
        let zero;
        let value = match data.get(field.name()) {
            Some(value) => value,
            None => {
                zero = Value::zero(field.schema.field_type);
                &zero
            }
        };
        write(&mut request, value).map_err(|message| Error::invalid_field(field.name(), message))?;
    }

    Ok(request)
}

/// Overwrite every read-mapped configuration field from a response
pub fn apply_response<Req, Resp>(
    fields: &[FieldMapping<Req, Resp>],
    response: &Resp,
    data: &mut ResourceData,
) {
    for field in fields {
        if let Some(read) = field.read {
            data.set(field.name(), read(response));
        }
    }
}

/// Names of the fields a table writes into its request struct
pub fn written_fields<Req, Resp>(fields: &[FieldMapping<Req, Resp>]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|f| f.write.is_some())
        .map(|f| f.name())
        .collect()
}
