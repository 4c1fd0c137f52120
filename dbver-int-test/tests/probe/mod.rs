mod user_version_test;
