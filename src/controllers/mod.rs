pub mod review_controller;
