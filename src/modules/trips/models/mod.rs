mod trip;

pub use trip::{
    CreateTripRequest, Trip, TripFilter, TripListQuery, TripResponse, TripType, UpdateTripRequest,
};
