pub mod city;
pub mod dto;
pub mod point_of_interest;
