pub mod cities;
pub mod health_check;
pub mod not_found;
pub mod points_of_interest;

pub use cities::{get_cities, get_city};
pub use health_check::health_check;
pub use not_found::not_found;
pub use points_of_interest::{
    create_point_of_interest, delete_point_of_interest, get_point_of_interest,
    get_points_of_interest, update_point_of_interest,
};
