mod health;
mod login;
mod users;
