pub mod picking;
