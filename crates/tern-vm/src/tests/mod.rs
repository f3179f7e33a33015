mod vm_integration_tests;
