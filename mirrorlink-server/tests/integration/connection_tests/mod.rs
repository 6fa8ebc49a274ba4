mod test_shutdown_releases_rooms;
