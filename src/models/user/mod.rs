pub mod db_user;
