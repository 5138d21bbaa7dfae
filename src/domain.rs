pub mod city_info;
pub mod mapping;
pub mod notification;
