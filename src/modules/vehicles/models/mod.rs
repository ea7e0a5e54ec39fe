mod vehicle;

pub use vehicle::{
    is_valid_colombian_plate, normalize_plate, CreateVehicleRequest, UpdateVehicleRequest,
    Vehicle, VehicleListQuery, VehicleStatus, VehicleType,
};
