pub mod course_server;
