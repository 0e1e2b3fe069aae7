pub mod mapper;
pub mod normalize;
pub mod odx_model;
pub mod writer;

pub use mapper::{
    OdxCollection, OdxCommParams, OdxDataIdentifier, OdxService, ParamDescriptor, ParamKind,
    ParamValue, StructureField, data_identifier_from_parts, map_data_identifier, map_document,
    map_service,
};
pub use normalize::{normalize_hex, normalize_service_id, positive_response_id};
pub use writer::{OdxWriteError, OdxWriteOptions, write_odx};
